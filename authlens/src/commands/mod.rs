pub mod report;
pub mod unlock;
