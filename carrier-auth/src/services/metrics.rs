//! Authentication counters, exported through the service-core Prometheus
//! recorder.

use crate::models::PrincipalKind;

pub const LOGIN_TOTAL: &str = "auth_login_total";
pub const REGISTRATION_TOTAL: &str = "auth_registration_total";

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

pub fn record_login(kind: PrincipalKind, outcome: Outcome) {
    metrics::counter!(
        LOGIN_TOTAL,
        "type" => kind.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_registration(kind: PrincipalKind, outcome: Outcome) {
    metrics::counter!(
        REGISTRATION_TOTAL,
        "type" => kind.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
