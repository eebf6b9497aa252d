//! Email delivery port trait
//!
//! The mail service renders and sends the message; we only hand over the
//! assignment and recipient.

use async_trait::async_trait;

use crate::domain::entities::{HomeworkAssignment, Learner};
use crate::error::DeliveryError;

#[async_trait]
pub trait EmailDelivery: Send + Sync {
    /// Send the homework for `assignment` to `learner`
    async fn send_homework(
        &self,
        assignment: &HomeworkAssignment,
        learner: &Learner,
    ) -> Result<(), DeliveryError>;
}
