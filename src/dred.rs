//! Deep-redundancy (DRED) decoding.
//!
//! DRED packets carry a neural re-encoding of up to about a second of prior
//! audio. The [`DredDecoder`] extracts that redundancy from a packet into a
//! [`Dred`] state; an ordinary [`Decoder`](crate::Decoder) then renders
//! audio from the state via
//! [`dred_decode`](crate::Decoder::dred_decode). Both are native sessions
//! under the same handle discipline as every other coder kind.
//!
//! Requires libopus 1.5+ built with DRED enabled.

use libc::c_int;
use log::debug;

use crate::ctl::{ctl, generic};
use crate::error::{check, Result};
use crate::ffi;
use crate::handle::SessionHandle;

/// A DRED extraction session.
pub struct DredDecoder {
    handle: SessionHandle<ffi::OpusDREDDecoder>,
}

impl DredDecoder {
    pub fn new() -> Result<DredDecoder> {
        let mut error = 0;
        let ptr = unsafe { ffi::opus_dred_decoder_create(&mut error) };
        let handle = SessionHandle::from_create(
            "opus_dred_decoder_create",
            ptr,
            error,
            ffi::opus_dred_decoder_destroy,
        )?;
        debug!("dred decoder session");
        Ok(DredDecoder { handle })
    }

    /// Extracts the redundancy of `packet` into `dred`.
    ///
    /// `max_samples` caps how much redundancy (at `sample_rate`) will be
    /// needed; with `defer_processing` set, the expensive part of decoding
    /// is postponed until [`process`](Self::process). Returns the offset in
    /// samples of the newest decodable redundancy relative to the packet,
    /// and the gap in samples between the redundancy and the packet itself.
    pub fn parse(
        &mut self,
        dred: &mut Dred,
        packet: &[u8],
        max_samples: usize,
        sample_rate: u32,
        defer_processing: bool,
    ) -> Result<(usize, usize)> {
        let ptr = self.handle.get("opus_dred_parse")?;
        let dred_ptr = dred.as_mut_ptr("opus_dred_parse")?;
        let mut dred_end: c_int = 0;
        let offset = unsafe {
            ffi::opus_dred_parse(
                ptr,
                dred_ptr,
                packet.as_ptr(),
                packet.len() as i32,
                max_samples as i32,
                sample_rate as i32,
                &mut dred_end,
                defer_processing as c_int,
            )
        };
        let offset = check("opus_dred_parse", offset)?;
        Ok((offset as usize, dred_end as usize))
    }

    /// Finishes the processing a deferred [`parse`](Self::parse) postponed;
    /// `src` and `dst` may name the same state through two bindings.
    pub fn process(&mut self, src: &Dred, dst: &mut Dred) -> Result<()> {
        let ptr = self.handle.get("opus_dred_process")?;
        let src_ptr = src.as_ptr("opus_dred_process")?;
        let dst_ptr = dst.as_mut_ptr("opus_dred_process")?;
        let result = unsafe { ffi::opus_dred_process(ptr, src_ptr, dst_ptr) };
        check("opus_dred_process", result)?;
        Ok(())
    }

    /// Resets the session to the state of a freshly constructed one.
    pub fn reset_state(&mut self) -> Result<()> {
        let ptr = self.handle.get("opus_dred_decoder_ctl")?;
        ctl!(opus_dred_decoder_ctl, ptr, generic::RESET_STATE);
        Ok(())
    }

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        let ptr = self.handle.get("opus_dred_decoder_ctl")?;
        check("opus_dred_decoder_ctl", unsafe {
            ffi::opus_dred_decoder_ctl(ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        let ptr = self.handle.get("opus_dred_decoder_ctl")?;
        check("opus_dred_decoder_ctl", unsafe {
            ffi::opus_dred_decoder_ctl(ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let ptr = self.handle.get("opus_dred_decoder_ctl")?;
        let mut value: i32 = 0;
        check("opus_dred_decoder_ctl", unsafe {
            ffi::opus_dred_decoder_ctl(ptr, request, &mut value)
        })?;
        Ok(value)
    }

    /// Releases the native session now instead of at drop; idempotent.
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}

/// Extracted redundancy, ready to render through a decoder.
pub struct Dred {
    handle: SessionHandle<ffi::OpusDRED>,
}

impl Dred {
    pub fn new() -> Result<Dred> {
        let mut error = 0;
        let ptr = unsafe { ffi::opus_dred_alloc(&mut error) };
        let handle = SessionHandle::from_create("opus_dred_alloc", ptr, error, ffi::opus_dred_free)?;
        Ok(Dred { handle })
    }

    pub(crate) fn as_ptr(&self, what: &'static str) -> Result<*const ffi::OpusDRED> {
        Ok(self.handle.get(what)? as *const ffi::OpusDRED)
    }

    pub(crate) fn as_mut_ptr(&mut self, what: &'static str) -> Result<*mut ffi::OpusDRED> {
        self.handle.get(what)
    }

    /// Releases the native state now instead of at drop; idempotent.
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}
