//! Trait definitions for the billing subsystem.

use crate::types::*;
use crate::Result;

/// Hosted checkout provider
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session for `plan` on behalf of `user_id`
    ///
    /// # Arguments
    /// * `user_id` - Platform user id, echoed back as the client reference
    /// * `plan` - Plan being purchased
    ///
    /// # Returns
    /// * The created session
    ///
    /// # Errors
    /// * `Provider` - The provider rejected the request
    /// * `HttpError` - The provider could not be reached
    fn create_checkout_session(
        &self,
        user_id: &str,
        plan: Plan,
    ) -> impl std::future::Future<Output = Result<CheckoutSession>> + Send;
}
