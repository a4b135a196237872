pub mod mark;
pub mod staging;

use std::sync::Arc;

use crate::domain::models::StagingServiceBox;
use crate::domain::models::SummaryServiceBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn summary() -> SummaryServiceBox {
        return Arc::<mark::MarkBackend>::default();
    }

    pub fn staging() -> StagingServiceBox {
        return Arc::<staging::StagingBackend>::default();
    }
}
