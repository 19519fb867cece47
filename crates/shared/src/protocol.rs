use serde::{Deserialize, Serialize};

use crate::domain::Account;

pub fn account_route() -> &'static str {
    "/account"
}

pub fn account_refresh_route() -> &'static str {
    "/account/refresh"
}

/// Body of `POST /account/refresh`: the snapshot the client currently holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshAccountRequest {
    pub account: Account,
}
