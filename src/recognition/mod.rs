//! Track recognition - asks an external service which song a file contains.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - our types, independent of any service
//! - **Backends** - `shazam` (SongRec subprocess) and `acoustid` (fpcalc + HTTP)
//! - **Traits** (`traits.rs`) - the [`Recognizer`] seam used by the tagger and tests
//! - **Retry** (`retry.rs`) - the sequential retry loop around one call
//!
//! ```ignore
//! let recognizer = recognition::build(Backend::Shazam, &config.recognition, None)?;
//! let track = recognize_with_retry(recognizer.as_ref(), path, RetryPolicy::default()).await?;
//! ```

pub mod acoustid;
pub mod domain;
pub mod fingerprint;
pub mod retry;
pub mod shazam;
pub mod tools;
pub mod traits;

use std::sync::Arc;

pub use domain::{AudioFingerprint, Backend, RecognitionError, RecognizedTrack};
pub use retry::{RetryPolicy, recognize_with_retry};
pub use traits::Recognizer;

use crate::config::RecognitionConfig;

/// Build the recognizer for `backend`.
///
/// AcoustID needs an API key; the Shazam backend does not.
pub fn build(
    backend: Backend,
    config: &RecognitionConfig,
    acoustid_api_key: Option<&str>,
) -> Result<Arc<dyn Recognizer>, RecognitionError> {
    match backend {
        Backend::Shazam => Ok(Arc::new(shazam::SongRecRecognizer::new(
            config.songrec_path.clone(),
        ))),
        Backend::Acoustid => {
            let api_key = acoustid_api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| RecognitionError::Api("AcoustID API key required".to_string()))?;
            Ok(Arc::new(acoustid::AcoustIdRecognizer::new(
                api_key,
                config.fpcalc_path.clone(),
                config.min_confidence,
            )?))
        }
    }
}
