//! Requests the controller asks the executor to run, and their results

use nebula_shared::{App, AppSubmission, Developer, PromoteRequest, PromoteResponse, Stat};

use crate::client::{CatalogClient, ClientError};

/// Why the developer record is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPurpose {
    /// First load for an identity; failure replaces the whole view.
    Initial,
    /// Re-sync after a change the server computes (promotion, refresh).
    Reconcile,
}

/// A catalog call to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    FetchDeveloper {
        user_id: String,
        purpose: FetchPurpose,
    },
    FetchStats {
        user_id: String,
    },
    CreateApp {
        user_id: String,
        submission: AppSubmission,
    },
    UpdateApp {
        user_id: String,
        app_id: String,
        submission: AppSubmission,
    },
    Promote {
        user_id: String,
        request: PromoteRequest,
    },
}

impl Request {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Request::FetchDeveloper { .. } => "fetch_developer",
            Request::FetchStats { .. } => "fetch_stats",
            Request::CreateApp { .. } => "create_app",
            Request::UpdateApp { .. } => "update_app",
            Request::Promote { .. } => "promote",
        }
    }
}

/// A request tagged with the generation that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub generation: u64,
    pub request: Request,
}

/// Result of a [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Developer {
        purpose: FetchPurpose,
        result: Result<Developer, ClientError>,
    },
    Stats(Result<Vec<Stat>, ClientError>),
    Created(Result<App, ClientError>),
    Updated {
        app_id: String,
        result: Result<App, ClientError>,
    },
    Promoted {
        app_id: String,
        result: Result<PromoteResponse, ClientError>,
    },
}

/// An [`Outcome`] addressed to the generation that asked for it.
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub outcome: Outcome,
}

impl Command {
    /// Perform the request against the catalog.
    pub async fn execute(self, client: &CatalogClient) -> Completion {
        let outcome = match self.request {
            Request::FetchDeveloper { user_id, purpose } => Outcome::Developer {
                purpose,
                result: client.get_developer(&user_id).await,
            },
            Request::FetchStats { user_id } => Outcome::Stats(client.get_stats(&user_id).await),
            Request::CreateApp {
                user_id,
                submission,
            } => Outcome::Created(client.create_app(&user_id, &submission).await),
            Request::UpdateApp {
                user_id,
                app_id,
                submission,
            } => {
                let result = client.update_app(&user_id, &app_id, &submission).await;
                Outcome::Updated { app_id, result }
            }
            Request::Promote { user_id, request } => {
                let result = client.promote(&user_id, &request).await;
                Outcome::Promoted {
                    app_id: request.app_id,
                    result,
                }
            }
        };

        Completion {
            generation: self.generation,
            outcome,
        }
    }
}
