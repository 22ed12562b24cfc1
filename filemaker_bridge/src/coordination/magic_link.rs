use crate::bridge::FileMakerBridge;
use crate::identity::IdentityRecord;

use super::errors::CoordinationError;

/// Log in with a credential FileMaker signed and delivered out of band.
pub fn login_with_magic_link(
    bridge: &FileMakerBridge,
    credential: &str,
) -> Result<IdentityRecord, CoordinationError> {
    bridge.translator().translate(credential).ok_or_else(|| {
        tracing::warn!("FileMaker authentication failed for magic link");
        CoordinationError::Unauthorized
    })
}
