use serde::{Deserialize, Serialize};

pub const CODE_PARTIAL: u16 = 206;
pub const CODE_BAD_REQUEST: u16 = 400;
pub const CODE_NOT_FOUND: u16 = 404;
pub const CODE_INTERNAL: u16 = 500;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedSong {
    pub name: String,
    pub year: i32,
    pub artists: Vec<String>,
}

/// The result envelope of a recommendation request. Consumed verbatim by the
/// web layer, so its shape must not change.
///
/// `error_code` doubles as an informational qualifier: a successful outcome
/// carries 206 when some (but not all) seeds could not be resolved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendOutcome {
    pub success: bool,
    pub data: Vec<RecommendedSong>,
    pub error_message: Option<String>,
    pub error_code: Option<u16>,
}

impl RecommendOutcome {
    pub fn ok(data: Vec<RecommendedSong>) -> RecommendOutcome {
        RecommendOutcome {
            success: true,
            data,
            error_message: None,
            error_code: None,
        }
    }

    pub fn partial(data: Vec<RecommendedSong>, missing: &[String]) -> RecommendOutcome {
        RecommendOutcome {
            success: true,
            data,
            error_message: Some(format!(
                "Some songs were not found: {}",
                missing.join(", ")
            )),
            error_code: Some(CODE_PARTIAL),
        }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> RecommendOutcome {
        RecommendOutcome {
            success: false,
            data: Vec::new(),
            error_message: Some(message.into()),
            error_code: Some(code),
        }
    }
}
