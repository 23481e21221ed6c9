//! Device session lifecycle
//!
//! A session owns one open device handle for the duration of exactly one
//! transaction. The handle is dropped, and the device with it closed,
//! before the transaction outcome ever reaches the caller; unwinding out of
//! the transaction releases it the same way.

use crate::backend::{CtapBackend, CtapDevice};
use crate::error::{Error, Result};
use crate::status::CtapResult;

pub(crate) struct DeviceSession<D: CtapDevice> {
    device: D,
}

impl<D: CtapDevice> DeviceSession<D> {
    /// Open the device at `path`.
    pub(crate) fn open<B>(backend: &B, path: &str) -> Result<Self>
    where
        B: CtapBackend<Device = D>,
    {
        let device = backend.open(path).map_err(Error::DeviceOpen)?;
        Ok(Self { device })
    }

    /// Run one transaction and close the device.
    ///
    /// The close happens unconditionally, before the result is inspected.
    pub(crate) fn transact<T>(self, f: impl FnOnce(&mut D) -> CtapResult<T>) -> CtapResult<T> {
        let mut device = self.device;
        let result = f(&mut device);
        drop(device);
        result
    }
}
