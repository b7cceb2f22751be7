//! Multistream encoder and decoder facades.
//!
//! A multistream session codes up to 255 channels as a set of elementary
//! Opus streams. The channel mapping table (one byte per output channel,
//! naming the coded stream that channel comes from) is fixed at construction
//! and handed to the native constructor once; it is never consulted again on
//! the Rust side.

use std::marker::PhantomData;
use std::ptr;

use libc::c_int;
use log::debug;

use crate::ctl::{ctl, decoder as dec, encoder as enc, generic, multistream as ms};
use crate::error::{check, Error, Result};
use crate::ffi;
use crate::handle::SessionHandle;
use crate::{Application, Bandwidth, Bitrate, Signal};

// libopus reads exactly `channels` bytes from the mapping table, so a short
// slice would be an out-of-bounds read, not a reportable argument error.
fn check_mapping(what: &'static str, mapping: &[u8], channels: usize) -> Result<()> {
    if mapping.len() != channels {
        return Err(Error::native(what, ffi::OPUS_BAD_ARG));
    }
    Ok(())
}

/// An Opus multistream encoder session.
#[derive(Debug)]
pub struct MultistreamEncoder {
    handle: SessionHandle<ffi::OpusMSEncoder>,
    channels: usize,
}

impl MultistreamEncoder {
    /// Creates a multistream encoder coding `channels` input channels as
    /// `streams` elementary streams, of which the first `coupled_streams`
    /// are stereo pairs. `mapping` must hold one entry per channel.
    pub fn new(
        sample_rate: u32,
        channels: usize,
        streams: usize,
        coupled_streams: usize,
        mapping: &[u8],
        application: Application,
    ) -> Result<MultistreamEncoder> {
        check_mapping("opus_multistream_encoder_create", mapping, channels)?;
        let mut error = 0;
        let ptr = unsafe {
            ffi::opus_multistream_encoder_create(
                sample_rate as i32,
                channels as c_int,
                streams as c_int,
                coupled_streams as c_int,
                mapping.as_ptr(),
                application as c_int,
                &mut error,
            )
        };
        let handle = SessionHandle::from_create(
            "opus_multistream_encoder_create",
            ptr,
            error,
            ffi::opus_multistream_encoder_destroy,
        )?;
        debug!(
            "multistream encoder session: {} Hz, {} channels over {} streams ({} coupled)",
            sample_rate, channels, streams, coupled_streams
        );
        Ok(MultistreamEncoder { handle, channels })
    }

    /// Encodes one frame of 16-bit PCM interleaved across all input
    /// channels. Returns the encoded length in bytes.
    pub fn encode(&mut self, input: &[i16], output: &mut [u8]) -> Result<usize> {
        let ptr = self.handle.get("opus_multistream_encode")?;
        let len = unsafe {
            ffi::opus_multistream_encode(
                ptr,
                input.as_ptr(),
                input.len() as c_int / self.channels as c_int,
                output.as_mut_ptr(),
                output.len() as i32,
            )
        };
        let len = check("opus_multistream_encode", len)?;
        Ok(len as usize)
    }

    /// Encodes one frame of floating-point PCM; see [`encode`](Self::encode).
    pub fn encode_float(&mut self, input: &[f32], output: &mut [u8]) -> Result<usize> {
        let ptr = self.handle.get("opus_multistream_encode_float")?;
        let len = unsafe {
            ffi::opus_multistream_encode_float(
                ptr,
                input.as_ptr(),
                input.len() as c_int / self.channels as c_int,
                output.as_mut_ptr(),
                output.len() as i32,
            )
        };
        let len = check("opus_multistream_encode_float", len)?;
        Ok(len as usize)
    }

    // ------------------------------------------------------------------- CTLs

    pub fn reset_state(&mut self) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(opus_multistream_encoder_ctl, ptr, generic::RESET_STATE);
        Ok(())
    }

    pub fn final_range(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: u32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            generic::GET_FINAL_RANGE,
            &mut value
        );
        Ok(value)
    }

    pub fn sample_rate(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            generic::GET_SAMPLE_RATE,
            &mut value
        );
        Ok(value as u32)
    }

    /// Sets the target bitrate across all elementary streams together.
    pub fn set_bitrate(&mut self, bitrate: Bitrate) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_BITRATE,
            bitrate.raw()
        );
        Ok(())
    }

    pub fn bitrate(&mut self) -> Result<Bitrate> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_BITRATE,
            &mut value
        );
        Ok(Bitrate::from_raw(value))
    }

    pub fn set_application(&mut self, application: Application) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_APPLICATION,
            application as c_int
        );
        Ok(())
    }

    pub fn application(&mut self) -> Result<Application> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_APPLICATION,
            &mut value
        );
        Application::from_raw(value, "opus_multistream_encoder_ctl(GET_APPLICATION)")
    }

    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_COMPLEXITY,
            complexity
        );
        Ok(())
    }

    pub fn complexity(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_COMPLEXITY,
            &mut value
        );
        Ok(value)
    }

    pub fn set_signal(&mut self, signal: Signal) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_SIGNAL,
            signal as c_int
        );
        Ok(())
    }

    pub fn signal(&mut self) -> Result<Signal> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_SIGNAL,
            &mut value
        );
        Signal::from_raw(value, "opus_multistream_encoder_ctl(GET_SIGNAL)")
    }

    pub fn set_vbr(&mut self, vbr: bool) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_VBR,
            vbr as c_int
        );
        Ok(())
    }

    pub fn vbr(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_multistream_encoder_ctl, ptr, enc::GET_VBR, &mut value);
        Ok(value != 0)
    }

    pub fn set_vbr_constraint(&mut self, constrained: bool) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_VBR_CONSTRAINT,
            constrained as c_int
        );
        Ok(())
    }

    pub fn vbr_constraint(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_VBR_CONSTRAINT,
            &mut value
        );
        Ok(value != 0)
    }

    pub fn set_inband_fec(&mut self, fec: bool) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_INBAND_FEC,
            fec as c_int
        );
        Ok(())
    }

    pub fn inband_fec(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_INBAND_FEC,
            &mut value
        );
        Ok(value != 0)
    }

    pub fn set_packet_loss_perc(&mut self, percent: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_PACKET_LOSS_PERC,
            percent
        );
        Ok(())
    }

    pub fn packet_loss_perc(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_PACKET_LOSS_PERC,
            &mut value
        );
        Ok(value)
    }

    pub fn set_max_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::SET_MAX_BANDWIDTH,
            bandwidth as c_int
        );
        Ok(())
    }

    pub fn max_bandwidth(&mut self) -> Result<Bandwidth> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            enc::GET_MAX_BANDWIDTH,
            &mut value
        );
        Bandwidth::from_raw(value, "opus_multistream_encoder_ctl(GET_MAX_BANDWIDTH)")
    }

    /// Borrows the elementary encoder behind coded stream `stream`.
    ///
    /// The view lives inside the multistream session and is never released
    /// on its own; it borrows this facade, so the session cannot be closed
    /// out from under it.
    pub fn stream_state(&mut self, stream: usize) -> Result<EncoderStream<'_>> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut state: *mut ffi::OpusEncoder = ptr::null_mut();
        ctl!(
            opus_multistream_encoder_ctl,
            ptr,
            ms::GET_ENCODER_STATE,
            stream as c_int,
            &mut state
        );
        if state.is_null() {
            return Err(Error::native("opus_multistream_encoder_ctl(GET_ENCODER_STATE)", -3));
        }
        Ok(EncoderStream {
            ptr: state,
            _parent: PhantomData,
        })
    }

    // --------------------------------------------------------------- raw CTLs

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        check("opus_multistream_encoder_ctl", unsafe {
            ffi::opus_multistream_encoder_ctl(ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        check("opus_multistream_encoder_ctl", unsafe {
            ffi::opus_multistream_encoder_ctl(ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let ptr = self.handle.get("opus_multistream_encoder_ctl")?;
        let mut value: i32 = 0;
        check("opus_multistream_encoder_ctl", unsafe {
            ffi::opus_multistream_encoder_ctl(ptr, request, &mut value)
        })?;
        Ok(value)
    }

    // -------------------------------------------------------------- lifecycle

    /// Releases the native session now instead of at drop; idempotent.
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}

/// A borrowed elementary encoder inside a [`MultistreamEncoder`].
#[derive(Debug)]
pub struct EncoderStream<'a> {
    ptr: *mut ffi::OpusEncoder,
    _parent: PhantomData<&'a mut MultistreamEncoder>,
}

impl EncoderStream<'_> {
    /// Sets the target bitrate of this one elementary stream.
    pub fn set_bitrate(&mut self, bitrate: Bitrate) -> Result<()> {
        ctl!(opus_encoder_ctl, self.ptr, enc::SET_BITRATE, bitrate.raw());
        Ok(())
    }

    pub fn final_range(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        ctl!(
            opus_encoder_ctl,
            self.ptr,
            generic::GET_FINAL_RANGE,
            &mut value
        );
        Ok(value)
    }

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        check("opus_encoder_ctl", unsafe {
            ffi::opus_encoder_ctl(self.ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        check("opus_encoder_ctl", unsafe {
            ffi::opus_encoder_ctl(self.ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let mut value: i32 = 0;
        check("opus_encoder_ctl", unsafe {
            ffi::opus_encoder_ctl(self.ptr, request, &mut value)
        })?;
        Ok(value)
    }
}

/// An Opus multistream decoder session.
#[derive(Debug)]
pub struct MultistreamDecoder {
    handle: SessionHandle<ffi::OpusMSDecoder>,
    channels: usize,
}

impl MultistreamDecoder {
    /// Creates a multistream decoder; the parameters and mapping table must
    /// match the encoder's.
    pub fn new(
        sample_rate: u32,
        channels: usize,
        streams: usize,
        coupled_streams: usize,
        mapping: &[u8],
    ) -> Result<MultistreamDecoder> {
        check_mapping("opus_multistream_decoder_create", mapping, channels)?;
        let mut error = 0;
        let ptr = unsafe {
            ffi::opus_multistream_decoder_create(
                sample_rate as i32,
                channels as c_int,
                streams as c_int,
                coupled_streams as c_int,
                mapping.as_ptr(),
                &mut error,
            )
        };
        let handle = SessionHandle::from_create(
            "opus_multistream_decoder_create",
            ptr,
            error,
            ffi::opus_multistream_decoder_destroy,
        )?;
        debug!(
            "multistream decoder session: {} Hz, {} channels over {} streams ({} coupled)",
            sample_rate, channels, streams, coupled_streams
        );
        Ok(MultistreamDecoder { handle, channels })
    }

    /// Decodes one packet into 16-bit PCM interleaved across all output
    /// channels. An empty `input` reports a lost packet, as on
    /// [`Decoder::decode`](crate::Decoder::decode).
    pub fn decode(&mut self, input: &[u8], output: &mut [i16], fec: bool) -> Result<usize> {
        let ptr = self.handle.get("opus_multistream_decode")?;
        let data = if input.is_empty() {
            ptr::null()
        } else {
            input.as_ptr()
        };
        let len = unsafe {
            ffi::opus_multistream_decode(
                ptr,
                data,
                input.len() as i32,
                output.as_mut_ptr(),
                output.len() as c_int / self.channels as c_int,
                fec as c_int,
            )
        };
        let len = check("opus_multistream_decode", len)?;
        Ok(len as usize)
    }

    /// Decodes one packet into float PCM; see [`decode`](Self::decode).
    pub fn decode_float(&mut self, input: &[u8], output: &mut [f32], fec: bool) -> Result<usize> {
        let ptr = self.handle.get("opus_multistream_decode_float")?;
        let data = if input.is_empty() {
            ptr::null()
        } else {
            input.as_ptr()
        };
        let len = unsafe {
            ffi::opus_multistream_decode_float(
                ptr,
                data,
                input.len() as i32,
                output.as_mut_ptr(),
                output.len() as c_int / self.channels as c_int,
                fec as c_int,
            )
        };
        let len = check("opus_multistream_decode_float", len)?;
        Ok(len as usize)
    }

    // ------------------------------------------------------------------- CTLs

    pub fn reset_state(&mut self) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        ctl!(opus_multistream_decoder_ctl, ptr, generic::RESET_STATE);
        Ok(())
    }

    pub fn final_range(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        let mut value: u32 = 0;
        ctl!(
            opus_multistream_decoder_ctl,
            ptr,
            generic::GET_FINAL_RANGE,
            &mut value
        );
        Ok(value)
    }

    pub fn sample_rate(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_decoder_ctl,
            ptr,
            generic::GET_SAMPLE_RATE,
            &mut value
        );
        Ok(value as u32)
    }

    /// Scales the output by `gain` in Q8 dB units, -32768 to 32767.
    pub fn set_gain(&mut self, gain: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        ctl!(opus_multistream_decoder_ctl, ptr, dec::SET_GAIN, gain);
        Ok(())
    }

    pub fn gain(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_multistream_decoder_ctl, ptr, dec::GET_GAIN, &mut value);
        Ok(value)
    }

    /// Duration of the last decoded or concealed packet, in samples per
    /// channel.
    pub fn last_packet_duration(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_multistream_decoder_ctl,
            ptr,
            dec::GET_LAST_PACKET_DURATION,
            &mut value
        );
        Ok(value as u32)
    }

    /// Borrows the elementary decoder behind coded stream `stream`.
    pub fn stream_state(&mut self, stream: usize) -> Result<DecoderStream<'_>> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        let mut state: *mut ffi::OpusDecoder = ptr::null_mut();
        ctl!(
            opus_multistream_decoder_ctl,
            ptr,
            ms::GET_DECODER_STATE,
            stream as c_int,
            &mut state
        );
        if state.is_null() {
            return Err(Error::native("opus_multistream_decoder_ctl(GET_DECODER_STATE)", -3));
        }
        Ok(DecoderStream {
            ptr: state,
            _parent: PhantomData,
        })
    }

    // --------------------------------------------------------------- raw CTLs

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        check("opus_multistream_decoder_ctl", unsafe {
            ffi::opus_multistream_decoder_ctl(ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        check("opus_multistream_decoder_ctl", unsafe {
            ffi::opus_multistream_decoder_ctl(ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let ptr = self.handle.get("opus_multistream_decoder_ctl")?;
        let mut value: i32 = 0;
        check("opus_multistream_decoder_ctl", unsafe {
            ffi::opus_multistream_decoder_ctl(ptr, request, &mut value)
        })?;
        Ok(value)
    }

    // -------------------------------------------------------------- lifecycle

    /// Releases the native session now instead of at drop; idempotent.
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}

/// A borrowed elementary decoder inside a [`MultistreamDecoder`].
#[derive(Debug)]
pub struct DecoderStream<'a> {
    ptr: *mut ffi::OpusDecoder,
    _parent: PhantomData<&'a mut MultistreamDecoder>,
}

impl DecoderStream<'_> {
    /// Scales this one stream's output by `gain` in Q8 dB units.
    pub fn set_gain(&mut self, gain: i32) -> Result<()> {
        ctl!(opus_decoder_ctl, self.ptr, dec::SET_GAIN, gain);
        Ok(())
    }

    pub fn final_range(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        ctl!(
            opus_decoder_ctl,
            self.ptr,
            generic::GET_FINAL_RANGE,
            &mut value
        );
        Ok(value)
    }

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        check("opus_decoder_ctl", unsafe {
            ffi::opus_decoder_ctl(self.ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        check("opus_decoder_ctl", unsafe {
            ffi::opus_decoder_ctl(self.ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let mut value: i32 = 0;
        check("opus_decoder_ctl", unsafe {
            ffi::opus_decoder_ctl(self.ptr, request, &mut value)
        })?;
        Ok(value)
    }
}
