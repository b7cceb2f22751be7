//! The repacketizer facade: merges and splits Opus packets without
//! re-coding the audio.

use std::marker::PhantomData;

use libc::c_int;
use log::debug;

use crate::error::{check, Result};
use crate::ffi;
use crate::handle::SessionHandle;

/// An Opus repacketizer session.
///
/// Packets are accumulated between [`begin`](Self::begin) calls; the borrow
/// rules keep every submitted packet alive until the merged output is
/// produced, which is what the native accumulator requires (it stores
/// pointers into the submitted buffers, not copies).
pub struct Repacketizer {
    handle: SessionHandle<ffi::OpusRepacketizer>,
}

impl Repacketizer {
    pub fn new() -> Result<Repacketizer> {
        let ptr = unsafe { ffi::opus_repacketizer_create() };
        let handle = SessionHandle::from_ptr(
            "opus_repacketizer_create",
            ptr,
            ffi::opus_repacketizer_destroy,
        )?;
        debug!("repacketizer session");
        Ok(Repacketizer { handle })
    }

    /// Starts over with an empty accumulator.
    pub fn begin<'rp, 'buf>(&'rp mut self) -> Result<RepacketizerState<'rp, 'buf>> {
        let ptr = self.handle.get("opus_repacketizer_init")?;
        unsafe {
            ffi::opus_repacketizer_init(ptr);
        }
        Ok(RepacketizerState {
            ptr,
            _rp: PhantomData,
            _buf: PhantomData,
        })
    }

    /// Merges `packets` into one packet in a single call.
    pub fn combine(&mut self, packets: &[&[u8]], buffer: &mut [u8]) -> Result<usize> {
        let mut state = self.begin()?;
        for packet in packets {
            state.cat(packet)?;
        }
        state.out(buffer)
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

/// One accumulation run of a [`Repacketizer`].
///
/// `'buf` is the lifetime of the submitted packets; the mutable borrow of
/// the parent (`'rp`) keeps the session from being closed or re-begun while
/// the run is live, so the raw pointer stays valid for the whole run.
#[derive(Debug)]
pub struct RepacketizerState<'rp, 'buf> {
    ptr: *mut ffi::OpusRepacketizer,
    _rp: PhantomData<&'rp mut Repacketizer>,
    _buf: PhantomData<&'buf [u8]>,
}

impl<'rp, 'buf> RepacketizerState<'rp, 'buf> {
    /// Appends the frames of `packet` to the accumulator.
    pub fn cat(&mut self, packet: &'buf [u8]) -> Result<()> {
        let result = unsafe {
            ffi::opus_repacketizer_cat(self.ptr, packet.as_ptr(), packet.len() as i32)
        };
        check("opus_repacketizer_cat", result)?;
        Ok(())
    }

    /// By-move variant of [`cat`](Self::cat), usable in a builder chain with
    /// packets of progressively shorter lifetimes.
    pub fn cat_move<'b2>(self, packet: &'b2 [u8]) -> Result<RepacketizerState<'rp, 'b2>>
    where
        'buf: 'b2,
    {
        let mut shortened: RepacketizerState<'rp, 'b2> = RepacketizerState {
            ptr: self.ptr,
            _rp: PhantomData,
            _buf: PhantomData,
        };
        shortened.cat(packet)?;
        Ok(shortened)
    }

    /// Frames accumulated since [`begin`](Repacketizer::begin).
    pub fn get_nb_frames(&mut self) -> usize {
        unsafe { ffi::opus_repacketizer_get_nb_frames(self.ptr) as usize }
    }

    /// Writes one packet holding everything submitted so far; returns its
    /// length in bytes.
    pub fn out(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let result = unsafe {
            ffi::opus_repacketizer_out(self.ptr, buffer.as_mut_ptr(), buffer.len() as i32)
        };
        let result = check("opus_repacketizer_out", result)?;
        Ok(result as usize)
    }

    /// Like [`out`](Self::out), but covering only the accumulated frames in
    /// `begin..end`.
    pub fn out_range(&mut self, begin: usize, end: usize, buffer: &mut [u8]) -> Result<usize> {
        let result = unsafe {
            ffi::opus_repacketizer_out_range(
                self.ptr,
                begin as c_int,
                end as c_int,
                buffer.as_mut_ptr(),
                buffer.len() as i32,
            )
        };
        let result = check("opus_repacketizer_out_range", result)?;
        Ok(result as usize)
    }
}
