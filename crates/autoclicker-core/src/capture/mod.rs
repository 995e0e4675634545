mod session;

pub use session::{CaptureSession, RawInput};
