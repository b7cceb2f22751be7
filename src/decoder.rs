//! The single-stream decoder facade.

use std::ptr;

use libc::c_int;
use log::debug;

use crate::ctl::{ctl, decoder as dec, generic};
use crate::error::{check, Result};
use crate::ffi;
use crate::handle::SessionHandle;
use crate::{Bandwidth, Channels};

#[cfg(feature = "dred")]
use crate::dred::Dred;

/// An Opus decoder session.
#[derive(Debug)]
pub struct Decoder {
    handle: SessionHandle<ffi::OpusDecoder>,
    channels: Channels,
}

impl Decoder {
    /// Creates a new decoder.
    ///
    /// `sample_rate` must be one of 8000, 12000, 16000, 24000, or 48000 Hz.
    pub fn new(sample_rate: u32, channels: Channels) -> Result<Decoder> {
        let mut error = 0;
        let ptr = unsafe {
            ffi::opus_decoder_create(sample_rate as i32, channels as c_int, &mut error)
        };
        let handle =
            SessionHandle::from_create("opus_decoder_create", ptr, error, ffi::opus_decoder_destroy)?;
        debug!("decoder session: {} Hz, {:?}", sample_rate, channels);
        Ok(Decoder { handle, channels })
    }

    /// Decodes one packet into 16-bit PCM, returning the samples written per
    /// channel.
    ///
    /// An empty `input` reports a lost packet and asks the coder to conceal
    /// it; in that case (and when `fec` is set) the output length must match
    /// the missing duration exactly and be a multiple of 2.5 ms at the
    /// session's sample rate, otherwise the native contract leaves the
    /// decoder state undefined. With `fec` set, recovery data in `input` is
    /// decoded in place of the previous, lost packet.
    pub fn decode(&mut self, input: &[u8], output: &mut [i16], fec: bool) -> Result<usize> {
        let ptr = self.handle.get("opus_decode")?;
        let data = if input.is_empty() {
            ptr::null()
        } else {
            input.as_ptr()
        };
        let len = unsafe {
            ffi::opus_decode(
                ptr,
                data,
                input.len() as i32,
                output.as_mut_ptr(),
                output.len() as c_int / self.channels as c_int,
                fec as c_int,
            )
        };
        let len = check("opus_decode", len)?;
        Ok(len as usize)
    }

    /// Decodes one packet into float PCM; see [`decode`](Self::decode).
    pub fn decode_float(&mut self, input: &[u8], output: &mut [f32], fec: bool) -> Result<usize> {
        let ptr = self.handle.get("opus_decode_float")?;
        let data = if input.is_empty() {
            ptr::null()
        } else {
            input.as_ptr()
        };
        let len = unsafe {
            ffi::opus_decode_float(
                ptr,
                data,
                input.len() as i32,
                output.as_mut_ptr(),
                output.len() as c_int / self.channels as c_int,
                fec as c_int,
            )
        };
        let len = check("opus_decode_float", len)?;
        Ok(len as usize)
    }

    /// The number of samples per channel `packet` would decode to on this
    /// session, without decoding it.
    pub fn nb_samples(&self, packet: &[u8]) -> Result<usize> {
        let ptr = self.handle.get("opus_decoder_get_nb_samples")?;
        let len = unsafe {
            ffi::opus_decoder_get_nb_samples(ptr, packet.as_ptr(), packet.len() as i32)
        };
        let len = check("opus_decoder_get_nb_samples", len)?;
        Ok(len as usize)
    }

    /// Renders audio recovered from a DRED state through this decoder.
    ///
    /// `offset` is how many samples before the lost packet the redundancy
    /// starts; the output length determines the frame size as in
    /// [`decode`](Self::decode).
    #[cfg(feature = "dred")]
    pub fn dred_decode(&mut self, dred: &Dred, offset: usize, output: &mut [i16]) -> Result<usize> {
        let ptr = self.handle.get("opus_decoder_dred_decode")?;
        let dred_ptr = dred.as_ptr("opus_decoder_dred_decode")?;
        let len = unsafe {
            ffi::opus_decoder_dred_decode(
                ptr,
                dred_ptr,
                offset as i32,
                output.as_mut_ptr(),
                output.len() as i32 / self.channels as i32,
            )
        };
        let len = check("opus_decoder_dred_decode", len)?;
        Ok(len as usize)
    }

    /// Float variant of [`dred_decode`](Self::dred_decode).
    #[cfg(feature = "dred")]
    pub fn dred_decode_float(
        &mut self,
        dred: &Dred,
        offset: usize,
        output: &mut [f32],
    ) -> Result<usize> {
        let ptr = self.handle.get("opus_decoder_dred_decode_float")?;
        let dred_ptr = dred.as_ptr("opus_decoder_dred_decode_float")?;
        let len = unsafe {
            ffi::opus_decoder_dred_decode_float(
                ptr,
                dred_ptr,
                offset as i32,
                output.as_mut_ptr(),
                output.len() as i32 / self.channels as i32,
            )
        };
        let len = check("opus_decoder_dred_decode_float", len)?;
        Ok(len as usize)
    }

    // ------------------------------------------------------------ generic CTLs

    /// Resets the coder to the state of a freshly constructed one.
    pub fn reset_state(&mut self) -> Result<()> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        ctl!(opus_decoder_ctl, ptr, generic::RESET_STATE);
        Ok(())
    }

    /// The final state of the entropy coder after the last decode.
    pub fn final_range(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: u32 = 0;
        ctl!(opus_decoder_ctl, ptr, generic::GET_FINAL_RANGE, &mut value);
        Ok(value)
    }

    /// The sample rate this session was constructed with.
    pub fn sample_rate(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_decoder_ctl, ptr, generic::GET_SAMPLE_RATE, &mut value);
        Ok(value as u32)
    }

    /// The bandpass of the last decoded packet.
    pub fn bandwidth(&mut self) -> Result<Bandwidth> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_decoder_ctl, ptr, generic::GET_BANDWIDTH, &mut value);
        Bandwidth::from_raw(value, "opus_decoder_ctl(GET_BANDWIDTH)")
    }

    pub fn set_phase_inversion_disabled(&mut self, disabled: bool) -> Result<()> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        ctl!(
            opus_decoder_ctl,
            ptr,
            generic::SET_PHASE_INVERSION_DISABLED,
            disabled as c_int
        );
        Ok(())
    }

    pub fn phase_inversion_disabled(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_decoder_ctl,
            ptr,
            generic::GET_PHASE_INVERSION_DISABLED,
            &mut value
        );
        Ok(value != 0)
    }

    // ------------------------------------------------------------ decoder CTLs

    /// Scales the output by `gain` in Q8 dB units, -32768 to 32767.
    pub fn set_gain(&mut self, gain: i32) -> Result<()> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        ctl!(opus_decoder_ctl, ptr, dec::SET_GAIN, gain);
        Ok(())
    }

    pub fn gain(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_decoder_ctl, ptr, dec::GET_GAIN, &mut value);
        Ok(value)
    }

    /// Duration of the last decoded or concealed packet, in samples per
    /// channel.
    pub fn last_packet_duration(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_decoder_ctl,
            ptr,
            dec::GET_LAST_PACKET_DURATION,
            &mut value
        );
        Ok(value as u32)
    }

    /// Pitch period of the last decoded frame, or `None` for unvoiced frames
    /// or when no frame was decoded yet.
    pub fn pitch(&mut self) -> Result<Option<i32>> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_decoder_ctl, ptr, dec::GET_PITCH, &mut value);
        Ok(if value == 0 { None } else { Some(value) })
    }

    // --------------------------------------------------------------- raw CTLs

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        check("opus_decoder_ctl", unsafe {
            ffi::opus_decoder_ctl(ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        check("opus_decoder_ctl", unsafe {
            ffi::opus_decoder_ctl(ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let ptr = self.handle.get("opus_decoder_ctl")?;
        let mut value: i32 = 0;
        check("opus_decoder_ctl", unsafe {
            ffi::opus_decoder_ctl(ptr, request, &mut value)
        })?;
        Ok(value)
    }

    // -------------------------------------------------------------- lifecycle

    /// Releases the native session now instead of at drop. Idempotent; any
    /// later call on this decoder fails with
    /// [`ErrorCode::Disposed`](crate::ErrorCode::Disposed).
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}
