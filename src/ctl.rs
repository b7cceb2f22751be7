//! Control-request protocol.
//!
//! Request codes are plain integers partitioned into families; a family's
//! codes are only meaningful on the matching session kind, and libopus
//! answers a mismatched code with an error which the facades surface like any
//! other failure. The codes here mirror `opus_defines.h` and
//! `opus_multistream.h`.
//!
//! The crate-internal `ctl!` macro is the single dispatch point for CTL
//! traffic: every payload shape (no payload, int in, int out, unsigned out,
//! index in plus pointer out) goes through it and gets the same error check.

/// Requests valid on every session kind.
pub mod generic {
    use libc::c_int;

    pub const RESET_STATE: c_int = 4028;
    pub const GET_FINAL_RANGE: c_int = 4031;
    pub const GET_BANDWIDTH: c_int = 4009;
    pub const GET_SAMPLE_RATE: c_int = 4029;
    pub const SET_PHASE_INVERSION_DISABLED: c_int = 4046;
    pub const GET_PHASE_INVERSION_DISABLED: c_int = 4047;
}

/// Encoder-only requests.
pub mod encoder {
    use libc::c_int;

    pub const SET_APPLICATION: c_int = 4000;
    pub const GET_APPLICATION: c_int = 4001;
    pub const SET_BITRATE: c_int = 4002;
    pub const GET_BITRATE: c_int = 4003;
    pub const SET_MAX_BANDWIDTH: c_int = 4004;
    pub const GET_MAX_BANDWIDTH: c_int = 4005;
    pub const SET_VBR: c_int = 4006;
    pub const GET_VBR: c_int = 4007;
    pub const SET_BANDWIDTH: c_int = 4008;
    pub const SET_COMPLEXITY: c_int = 4010;
    pub const GET_COMPLEXITY: c_int = 4011;
    pub const SET_INBAND_FEC: c_int = 4012;
    pub const GET_INBAND_FEC: c_int = 4013;
    pub const SET_PACKET_LOSS_PERC: c_int = 4014;
    pub const GET_PACKET_LOSS_PERC: c_int = 4015;
    pub const SET_DTX: c_int = 4016;
    pub const GET_DTX: c_int = 4017;
    pub const SET_VBR_CONSTRAINT: c_int = 4020;
    pub const GET_VBR_CONSTRAINT: c_int = 4021;
    pub const SET_FORCE_CHANNELS: c_int = 4022;
    pub const GET_FORCE_CHANNELS: c_int = 4023;
    pub const SET_SIGNAL: c_int = 4024;
    pub const GET_SIGNAL: c_int = 4025;
    pub const GET_LOOKAHEAD: c_int = 4027;
    pub const SET_LSB_DEPTH: c_int = 4036;
    pub const GET_LSB_DEPTH: c_int = 4037;
    pub const SET_EXPERT_FRAME_DURATION: c_int = 4040;
    pub const GET_EXPERT_FRAME_DURATION: c_int = 4041;
    pub const SET_PREDICTION_DISABLED: c_int = 4042;
    pub const GET_PREDICTION_DISABLED: c_int = 4043;
    // Listed as generic in the docs but only answered by encoders.
    pub const GET_IN_DTX: c_int = 4049;
    #[cfg(feature = "dred")]
    pub const SET_DRED_DURATION: c_int = 4050;
    #[cfg(feature = "dred")]
    pub const GET_DRED_DURATION: c_int = 4051;
}

/// Decoder-only requests.
pub mod decoder {
    use libc::c_int;

    pub const SET_GAIN: c_int = 4034;
    pub const GET_GAIN: c_int = 4045; // should have been 4035, kept for ABI compat
    pub const GET_LAST_PACKET_DURATION: c_int = 4039;
    pub const GET_PITCH: c_int = 4033;
}

/// Multistream-only requests.
pub mod multistream {
    use libc::c_int;

    pub const GET_ENCODER_STATE: c_int = 5120;
    pub const GET_DECODER_STATE: c_int = 5122;
}

macro_rules! ctl {
    ($f:ident, $ptr:expr, $request:expr $(, $arg:expr)*) => {
        match unsafe { crate::ffi::$f($ptr, $request $(, $arg)*) } {
            code if code < 0 => {
                return Err(crate::error::Error::native(
                    concat!(stringify!($f), "(", stringify!($request), ")"),
                    code,
                ))
            }
            _ => (),
        }
    };
}

pub(crate) use ctl;
