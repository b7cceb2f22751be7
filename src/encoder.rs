//! The single-stream encoder facade.

use libc::c_int;
use log::debug;

use crate::ctl::{ctl, encoder as enc, generic};
use crate::error::{check, Result};
use crate::ffi;
use crate::handle::SessionHandle;
use crate::{Application, Bandwidth, Bitrate, Channels, FrameDuration, Signal};

/// An Opus encoder session.
///
/// Sample rate and channel count are fixed at construction; everything else
/// is a live coder parameter read and written through the CTL protocol.
#[derive(Debug)]
pub struct Encoder {
    handle: SessionHandle<ffi::OpusEncoder>,
    channels: Channels,
}

impl Encoder {
    /// Creates a new encoder.
    ///
    /// `sample_rate` must be one of 8000, 12000, 16000, 24000, or 48000 Hz;
    /// the native library rejects anything else with `BadArg`.
    pub fn new(sample_rate: u32, channels: Channels, application: Application) -> Result<Encoder> {
        let mut error = 0;
        let ptr = unsafe {
            ffi::opus_encoder_create(
                sample_rate as i32,
                channels as c_int,
                application as c_int,
                &mut error,
            )
        };
        let handle =
            SessionHandle::from_create("opus_encoder_create", ptr, error, ffi::opus_encoder_destroy)?;
        debug!(
            "encoder session: {} Hz, {:?}, {:?}",
            sample_rate, channels, application
        );
        Ok(Encoder { handle, channels })
    }

    /// Encodes one frame of 16-bit PCM, interleaved by channel. The frame
    /// size is the input length divided by the channel count and must be one
    /// of the durations the coder supports at its sample rate (2.5 to 120 ms);
    /// anything else comes back as `BadArg` from the native call.
    ///
    /// The output length caps the instantaneous bitrate of this one packet.
    /// Returns the encoded length in bytes.
    pub fn encode(&mut self, input: &[i16], output: &mut [u8]) -> Result<usize> {
        let ptr = self.handle.get("opus_encode")?;
        let len = unsafe {
            ffi::opus_encode(
                ptr,
                input.as_ptr(),
                input.len() as c_int / self.channels as c_int,
                output.as_mut_ptr(),
                output.len() as i32,
            )
        };
        let len = check("opus_encode", len)?;
        Ok(len as usize)
    }

    /// Encodes one frame of floating-point PCM; see [`encode`](Self::encode).
    pub fn encode_float(&mut self, input: &[f32], output: &mut [u8]) -> Result<usize> {
        let ptr = self.handle.get("opus_encode_float")?;
        let len = unsafe {
            ffi::opus_encode_float(
                ptr,
                input.as_ptr(),
                input.len() as c_int / self.channels as c_int,
                output.as_mut_ptr(),
                output.len() as i32,
            )
        };
        let len = check("opus_encode_float", len)?;
        Ok(len as usize)
    }

    /// Encodes into a freshly allocated packet of at most `max_size` bytes.
    pub fn encode_vec(&mut self, input: &[i16], max_size: usize) -> Result<Vec<u8>> {
        let mut output = vec![0u8; max_size];
        let len = self.encode(input, &mut output)?;
        output.truncate(len);
        Ok(output)
    }

    /// Encodes float PCM into a freshly allocated packet of at most
    /// `max_size` bytes.
    pub fn encode_vec_float(&mut self, input: &[f32], max_size: usize) -> Result<Vec<u8>> {
        let mut output = vec![0u8; max_size];
        let len = self.encode_float(input, &mut output)?;
        output.truncate(len);
        Ok(output)
    }

    // ------------------------------------------------------------ generic CTLs

    /// Resets the coder to the state of a freshly constructed one, keeping
    /// the configured parameters.
    pub fn reset_state(&mut self) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, generic::RESET_STATE);
        Ok(())
    }

    /// The final state of the entropy coder after the last encode.
    pub fn final_range(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: u32 = 0;
        ctl!(opus_encoder_ctl, ptr, generic::GET_FINAL_RANGE, &mut value);
        Ok(value)
    }

    /// The sample rate this session was constructed with.
    pub fn sample_rate(&mut self) -> Result<u32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, generic::GET_SAMPLE_RATE, &mut value);
        Ok(value as u32)
    }

    /// The configured bandpass.
    pub fn bandwidth(&mut self) -> Result<Bandwidth> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, generic::GET_BANDWIDTH, &mut value);
        Bandwidth::from_raw(value, "opus_encoder_ctl(GET_BANDWIDTH)")
    }

    pub fn set_phase_inversion_disabled(&mut self, disabled: bool) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(
            opus_encoder_ctl,
            ptr,
            generic::SET_PHASE_INVERSION_DISABLED,
            disabled as c_int
        );
        Ok(())
    }

    pub fn phase_inversion_disabled(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_encoder_ctl,
            ptr,
            generic::GET_PHASE_INVERSION_DISABLED,
            &mut value
        );
        Ok(value != 0)
    }

    // ------------------------------------------------------------ encoder CTLs

    /// Sets the target bitrate.
    pub fn set_bitrate(&mut self, bitrate: Bitrate) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_BITRATE, bitrate.raw());
        Ok(())
    }

    /// The configured target bitrate.
    pub fn bitrate(&mut self) -> Result<Bitrate> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_BITRATE, &mut value);
        Ok(Bitrate::from_raw(value))
    }

    /// Sets computational complexity, 0-10 inclusive.
    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_COMPLEXITY, complexity);
        Ok(())
    }

    pub fn complexity(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_COMPLEXITY, &mut value);
        Ok(value)
    }

    /// Switches the intended application after construction.
    pub fn set_application(&mut self, application: Application) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::SET_APPLICATION,
            application as c_int
        );
        Ok(())
    }

    pub fn application(&mut self) -> Result<Application> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_APPLICATION, &mut value);
        Application::from_raw(value, "opus_encoder_ctl(GET_APPLICATION)")
    }

    /// Enables or disables variable bitrate.
    pub fn set_vbr(&mut self, vbr: bool) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_VBR, vbr as c_int);
        Ok(())
    }

    pub fn vbr(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_VBR, &mut value);
        Ok(value != 0)
    }

    /// Constrains VBR to smooth out instantaneous bitrate swings.
    pub fn set_vbr_constraint(&mut self, constrained: bool) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::SET_VBR_CONSTRAINT,
            constrained as c_int
        );
        Ok(())
    }

    pub fn vbr_constraint(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_VBR_CONSTRAINT, &mut value);
        Ok(value != 0)
    }

    /// Forces a specific bandpass; [`Bandwidth::Auto`] restores the default.
    pub fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_BANDWIDTH, bandwidth as c_int);
        Ok(())
    }

    /// Caps the bandpass the encoder may select on its own.
    pub fn set_max_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::SET_MAX_BANDWIDTH,
            bandwidth as c_int
        );
        Ok(())
    }

    pub fn max_bandwidth(&mut self) -> Result<Bandwidth> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_MAX_BANDWIDTH, &mut value);
        Bandwidth::from_raw(value, "opus_encoder_ctl(GET_MAX_BANDWIDTH)")
    }

    /// Enables in-band forward error correction.
    pub fn set_inband_fec(&mut self, fec: bool) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_INBAND_FEC, fec as c_int);
        Ok(())
    }

    pub fn inband_fec(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_INBAND_FEC, &mut value);
        Ok(value != 0)
    }

    /// Tells the encoder how much loss to plan for, 0-100 percent.
    pub fn set_packet_loss_perc(&mut self, percent: i32) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_PACKET_LOSS_PERC, percent);
        Ok(())
    }

    pub fn packet_loss_perc(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_PACKET_LOSS_PERC, &mut value);
        Ok(value)
    }

    /// Enables discontinuous transmission (near-silent frames are dropped).
    pub fn set_dtx(&mut self, dtx: bool) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_DTX, dtx as c_int);
        Ok(())
    }

    pub fn dtx(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_DTX, &mut value);
        Ok(value != 0)
    }

    /// Whether the last encoded frame was suppressed by DTX.
    pub fn in_dtx(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_IN_DTX, &mut value);
        Ok(value != 0)
    }

    /// Forces mono or stereo coding; `None` restores automatic selection.
    pub fn set_force_channels(&mut self, channels: Option<Channels>) -> Result<()> {
        let value = match channels {
            Some(channels) => channels as c_int,
            None => -1000,
        };
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_FORCE_CHANNELS, value);
        Ok(())
    }

    pub fn force_channels(&mut self) -> Result<Option<Channels>> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_FORCE_CHANNELS, &mut value);
        Ok(match value {
            1 => Some(Channels::Mono),
            2 => Some(Channels::Stereo),
            _ => None,
        })
    }

    /// Hints whether the input is speech or music.
    pub fn set_signal(&mut self, signal: Signal) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_SIGNAL, signal as c_int);
        Ok(())
    }

    pub fn signal(&mut self) -> Result<Signal> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_SIGNAL, &mut value);
        Signal::from_raw(value, "opus_encoder_ctl(GET_SIGNAL)")
    }

    /// Total codec delay in samples at 48 kHz.
    pub fn lookahead(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_LOOKAHEAD, &mut value);
        Ok(value)
    }

    /// Declares the bit depth of the input signal, 8-24.
    pub fn set_lsb_depth(&mut self, depth: i32) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_LSB_DEPTH, depth);
        Ok(())
    }

    pub fn lsb_depth(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_LSB_DEPTH, &mut value);
        Ok(value)
    }

    /// Restricts frames to a fixed duration regardless of the encode call.
    pub fn set_expert_frame_duration(&mut self, duration: FrameDuration) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::SET_EXPERT_FRAME_DURATION,
            duration as c_int
        );
        Ok(())
    }

    pub fn expert_frame_duration(&mut self) -> Result<FrameDuration> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::GET_EXPERT_FRAME_DURATION,
            &mut value
        );
        FrameDuration::from_raw(value, "opus_encoder_ctl(GET_EXPERT_FRAME_DURATION)")
    }

    /// Makes frames almost completely independent of each other.
    pub fn set_prediction_disabled(&mut self, disabled: bool) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::SET_PREDICTION_DISABLED,
            disabled as c_int
        );
        Ok(())
    }

    pub fn prediction_disabled(&mut self) -> Result<bool> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(
            opus_encoder_ctl,
            ptr,
            enc::GET_PREDICTION_DISABLED,
            &mut value
        );
        Ok(value != 0)
    }

    /// Enables deep redundancy, carrying up to `frames` 10 ms units of
    /// recoverable audio in each packet; 0 disables it.
    #[cfg(feature = "dred")]
    pub fn set_dred_duration(&mut self, frames: i32) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        ctl!(opus_encoder_ctl, ptr, enc::SET_DRED_DURATION, frames);
        Ok(())
    }

    #[cfg(feature = "dred")]
    pub fn dred_duration(&mut self) -> Result<i32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        ctl!(opus_encoder_ctl, ptr, enc::GET_DRED_DURATION, &mut value);
        Ok(value)
    }

    // --------------------------------------------------------------- raw CTLs

    /// Issues a request that carries no payload.
    pub fn ctl_request(&mut self, request: i32) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        check("opus_encoder_ctl", unsafe {
            ffi::opus_encoder_ctl(ptr, request)
        })?;
        Ok(())
    }

    /// Issues a write-only request with a 32-bit argument.
    pub fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        check("opus_encoder_ctl", unsafe {
            ffi::opus_encoder_ctl(ptr, request, value)
        })?;
        Ok(())
    }

    /// Issues a read-only request with a 32-bit result.
    pub fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let ptr = self.handle.get("opus_encoder_ctl")?;
        let mut value: i32 = 0;
        check("opus_encoder_ctl", unsafe {
            ffi::opus_encoder_ctl(ptr, request, &mut value)
        })?;
        Ok(value)
    }

    // -------------------------------------------------------------- lifecycle

    /// Releases the native session now instead of at drop. Idempotent; any
    /// later call on this encoder fails with
    /// [`ErrorCode::Disposed`](crate::ErrorCode::Disposed).
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}
