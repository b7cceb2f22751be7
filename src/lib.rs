//! Safe bindings for libopus.
//!
//! Each coder kind in the native library (encoder, decoder, multistream
//! encoder/decoder, repacketizer, and, behind the `dred` feature, the DRED
//! decoder) is wrapped in a facade owning exactly one native session. A
//! session is released exactly once, either by an explicit `close()` or on
//! drop, and any use after that fails with [`ErrorCode::Disposed`] instead of
//! reaching the native library. All coder parameters are live: reads and
//! writes go through the CTL protocol on every call, nothing is cached on the
//! Rust side.
//!
//! ```no_run
//! let mut encoder = opuslink::Encoder::new(
//!     48000,
//!     opuslink::Channels::Stereo,
//!     opuslink::Application::Voip,
//! ).unwrap();
//! let pcm = vec![0i16; 2 * 960]; // one 20 ms stereo frame
//! let mut packet = vec![0u8; 4000];
//! let len = encoder.encode(&pcm, &mut packet).unwrap();
//! assert!(len <= 4000);
//! ```

use std::ffi::CStr;

use libc::c_int;

pub mod ctl;
mod decoder;
mod encoder;
mod error;
// The call surface mirrors the full header, including entry points the
// facades do not currently reach (sizes, placement-init).
#[allow(dead_code)]
mod ffi;
mod handle;
mod multistream;
pub mod packet;
mod repacketizer;

#[cfg(feature = "dred")]
pub mod dred;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, ErrorCode, Result};
pub use multistream::{DecoderStream, EncoderStream, MultistreamDecoder, MultistreamEncoder};
pub use repacketizer::{Repacketizer, RepacketizerState};

// ============================================================================
// Constants

/// The intended application of an encoder, set at construction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Application {
    /// Best for most VoIP/videoconference applications where listening
    /// quality and intelligibility matter most.
    Voip = 2048,
    /// Best for broadcast/high-fidelity application where the decoded audio
    /// should be as close as possible to the input.
    Audio = 2049,
    /// Only use when lowest-achievable latency is what matters most.
    LowDelay = 2051,
}

impl Application {
    fn from_raw(raw: c_int, what: &'static str) -> Result<Application> {
        match raw {
            2048 => Ok(Application::Voip),
            2049 => Ok(Application::Audio),
            2051 => Ok(Application::LowDelay),
            _ => Err(Error::native(what, ffi::OPUS_BAD_ARG)),
        }
    }
}

/// The number of interleaved channels in a single-stream session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Channels {
    Mono = 1,
    Stereo = 2,
}

/// The bandpass of a coder or packet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Bandwidth {
    /// Automatic selection (encoder configuration only).
    Auto = -1000,
    /// 4 kHz bandpass.
    Narrowband = 1101,
    /// 6 kHz bandpass.
    Mediumband = 1102,
    /// 8 kHz bandpass.
    Wideband = 1103,
    /// 12 kHz bandpass.
    Superwideband = 1104,
    /// 20 kHz bandpass.
    Fullband = 1105,
}

impl Bandwidth {
    fn from_raw(raw: c_int, what: &'static str) -> Result<Bandwidth> {
        match raw {
            -1000 => Ok(Bandwidth::Auto),
            1101 => Ok(Bandwidth::Narrowband),
            1102 => Ok(Bandwidth::Mediumband),
            1103 => Ok(Bandwidth::Wideband),
            1104 => Ok(Bandwidth::Superwideband),
            1105 => Ok(Bandwidth::Fullband),
            _ => Err(Error::native(what, ffi::OPUS_BAD_ARG)),
        }
    }
}

/// An encoder's target bitrate in bits per second.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Bitrate {
    /// Explicit bitrate; 500 to 512000 bits per second.
    Bits(i32),
    /// As high as the output buffer on each encode call allows.
    Max,
    /// Default for the session parameters (the initial state).
    Auto,
}

impl Bitrate {
    fn raw(self) -> c_int {
        match self {
            Bitrate::Bits(bits) => bits,
            Bitrate::Max => -1,
            Bitrate::Auto => -1000,
        }
    }

    fn from_raw(raw: c_int) -> Bitrate {
        match raw {
            -1 => Bitrate::Max,
            -1000 => Bitrate::Auto,
            bits => Bitrate::Bits(bits),
        }
    }
}

/// A hint about the type of signal being encoded.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Signal {
    Auto = -1000,
    Voice = 3001,
    Music = 3002,
}

impl Signal {
    fn from_raw(raw: c_int, what: &'static str) -> Result<Signal> {
        match raw {
            -1000 => Ok(Signal::Auto),
            3001 => Ok(Signal::Voice),
            3002 => Ok(Signal::Music),
            _ => Err(Error::native(what, ffi::OPUS_BAD_ARG)),
        }
    }
}

/// A frame-duration restriction for the encoder.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FrameDuration {
    /// Pick from the frame size passed to each encode call (default).
    Arg = 5000,
    Ms2_5 = 5001,
    Ms5 = 5002,
    Ms10 = 5003,
    Ms20 = 5004,
    Ms40 = 5005,
    Ms60 = 5006,
    Ms80 = 5007,
    Ms100 = 5008,
    Ms120 = 5009,
}

impl FrameDuration {
    fn from_raw(raw: c_int, what: &'static str) -> Result<FrameDuration> {
        match raw {
            5000 => Ok(FrameDuration::Arg),
            5001 => Ok(FrameDuration::Ms2_5),
            5002 => Ok(FrameDuration::Ms5),
            5003 => Ok(FrameDuration::Ms10),
            5004 => Ok(FrameDuration::Ms20),
            5005 => Ok(FrameDuration::Ms40),
            5006 => Ok(FrameDuration::Ms60),
            5007 => Ok(FrameDuration::Ms80),
            5008 => Ok(FrameDuration::Ms100),
            5009 => Ok(FrameDuration::Ms120),
            _ => Err(Error::native(what, ffi::OPUS_BAD_ARG)),
        }
    }
}

// ============================================================================
// Library info

/// The version string of the linked libopus.
pub fn version() -> &'static str {
    // The version string is a library-owned static and always ASCII.
    unsafe { CStr::from_ptr(ffi::opus_get_version_string()) }
        .to_str()
        .unwrap()
}

/// The native description of a raw error code.
///
/// The returned string is owned by the library and must not be freed; libopus
/// answers every input, including positive and unknown codes.
pub fn strerror(code: i32) -> &'static str {
    let ptr = unsafe { ffi::opus_strerror(code) };
    if ptr.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ============================================================================
// Float Soft Clipping

/// Soft-clips a float signal into the -1..1 range, tracking clip state
/// between frames.
pub struct SoftClip {
    channels: Channels,
    memory: [f32; 2],
}

impl SoftClip {
    pub fn new(channels: Channels) -> SoftClip {
        SoftClip {
            channels,
            memory: [0.0; 2],
        }
    }

    /// Clamps `signal` in place; interleaved like the coder buffers.
    pub fn apply(&mut self, signal: &mut [f32]) {
        unsafe {
            ffi::opus_pcm_soft_clip(
                signal.as_mut_ptr(),
                signal.len() as c_int / self.channels as c_int,
                self.channels as c_int,
                self.memory.as_mut_ptr(),
            )
        };
    }
}
