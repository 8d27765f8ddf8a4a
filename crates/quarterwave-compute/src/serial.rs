//! Single-threaded backend.

use crate::backend::{Amplitudes, BackendType, ComputeBackend, ComputeError, DeviceInfo};

/// Evaluates samples one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialBackend;

impl ComputeBackend for SerialBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: "Serial".into(),
            backend_type: BackendType::Serial,
            compute_units: Some(1),
        }
    }

    fn evaluate_samples(
        &self,
        len: usize,
        eval: &(dyn Fn(usize) -> Amplitudes + Send + Sync),
    ) -> Result<Vec<Amplitudes>, ComputeError> {
        Ok((0..len).map(eval).collect())
    }
}
