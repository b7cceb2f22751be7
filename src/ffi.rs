//! Raw call surface for libopus.
//!
//! Exact mirrors of the C entry points, nothing else. Every function here is
//! unsafe and takes raw pointers with explicit lengths; the safe wrappers in
//! the rest of the crate are the only intended callers. The `*_ctl` entry
//! points are C-variadic, matching the header.

use libc::{c_char, c_int, c_uchar};

use cfg_if::cfg_if;
cfg_if! {
    if #[cfg(feature = "static")] {
        #[link(name = "opus", kind = "static")]
        extern "C" {}
    } else {
        #[link(name = "opus")]
        extern "C" {}
    }
}

pub const OPUS_OK: c_int = 0;
pub const OPUS_BAD_ARG: c_int = -1;
pub const OPUS_ALLOC_FAIL: c_int = -7;

#[repr(C)]
pub struct OpusEncoder {
    _private: [u8; 0],
}

#[repr(C)]
pub struct OpusDecoder {
    _private: [u8; 0],
}

#[repr(C)]
pub struct OpusMSEncoder {
    _private: [u8; 0],
}

#[repr(C)]
pub struct OpusMSDecoder {
    _private: [u8; 0],
}

#[repr(C)]
pub struct OpusRepacketizer {
    _private: [u8; 0],
}

#[cfg(feature = "dred")]
#[repr(C)]
pub struct OpusDREDDecoder {
    _private: [u8; 0],
}

#[cfg(feature = "dred")]
#[repr(C)]
pub struct OpusDRED {
    _private: [u8; 0],
}

extern "C" {
    // ------------------------------------------------------------------ encoder
    pub fn opus_encoder_get_size(channels: c_int) -> c_int;
    pub fn opus_encoder_create(
        fs: i32,
        channels: c_int,
        application: c_int,
        error: *mut c_int,
    ) -> *mut OpusEncoder;
    pub fn opus_encoder_init(
        st: *mut OpusEncoder,
        fs: i32,
        channels: c_int,
        application: c_int,
    ) -> c_int;
    pub fn opus_encode(
        st: *mut OpusEncoder,
        pcm: *const i16,
        frame_size: c_int,
        data: *mut c_uchar,
        max_data_bytes: i32,
    ) -> i32;
    pub fn opus_encode_float(
        st: *mut OpusEncoder,
        pcm: *const f32,
        frame_size: c_int,
        data: *mut c_uchar,
        max_data_bytes: i32,
    ) -> i32;
    pub fn opus_encoder_destroy(st: *mut OpusEncoder);
    pub fn opus_encoder_ctl(st: *mut OpusEncoder, request: c_int, ...) -> c_int;

    // ------------------------------------------------------------------ decoder
    pub fn opus_decoder_get_size(channels: c_int) -> c_int;
    pub fn opus_decoder_create(fs: i32, channels: c_int, error: *mut c_int) -> *mut OpusDecoder;
    pub fn opus_decoder_init(st: *mut OpusDecoder, fs: i32, channels: c_int) -> c_int;
    pub fn opus_decode(
        st: *mut OpusDecoder,
        data: *const c_uchar,
        len: i32,
        pcm: *mut i16,
        frame_size: c_int,
        decode_fec: c_int,
    ) -> c_int;
    pub fn opus_decode_float(
        st: *mut OpusDecoder,
        data: *const c_uchar,
        len: i32,
        pcm: *mut f32,
        frame_size: c_int,
        decode_fec: c_int,
    ) -> c_int;
    pub fn opus_decoder_ctl(st: *mut OpusDecoder, request: c_int, ...) -> c_int;
    pub fn opus_decoder_destroy(st: *mut OpusDecoder);
    pub fn opus_decoder_get_nb_samples(
        dec: *const OpusDecoder,
        packet: *const c_uchar,
        len: i32,
    ) -> c_int;

    // ------------------------------------------------------------------ packets
    pub fn opus_packet_parse(
        data: *const c_uchar,
        len: i32,
        out_toc: *mut c_uchar,
        frames: *mut *const c_uchar,
        size: *mut i16,
        payload_offset: *mut c_int,
    ) -> c_int;
    pub fn opus_packet_get_bandwidth(data: *const c_uchar) -> c_int;
    pub fn opus_packet_get_samples_per_frame(data: *const c_uchar, fs: i32) -> c_int;
    pub fn opus_packet_get_nb_channels(data: *const c_uchar) -> c_int;
    pub fn opus_packet_get_nb_frames(packet: *const c_uchar, len: i32) -> c_int;
    pub fn opus_packet_get_nb_samples(packet: *const c_uchar, len: i32, fs: i32) -> c_int;
    pub fn opus_packet_pad(data: *mut c_uchar, len: i32, new_len: i32) -> c_int;
    pub fn opus_packet_unpad(data: *mut c_uchar, len: i32) -> i32;
    pub fn opus_multistream_packet_pad(
        data: *mut c_uchar,
        len: i32,
        new_len: i32,
        nb_streams: c_int,
    ) -> c_int;
    pub fn opus_multistream_packet_unpad(data: *mut c_uchar, len: i32, nb_streams: c_int) -> i32;
    pub fn opus_pcm_soft_clip(
        pcm: *mut f32,
        frame_size: c_int,
        channels: c_int,
        softclip_mem: *mut f32,
    );

    // ------------------------------------------------------------- repacketizer
    pub fn opus_repacketizer_get_size() -> c_int;
    pub fn opus_repacketizer_init(rp: *mut OpusRepacketizer) -> *mut OpusRepacketizer;
    pub fn opus_repacketizer_create() -> *mut OpusRepacketizer;
    pub fn opus_repacketizer_destroy(rp: *mut OpusRepacketizer);
    pub fn opus_repacketizer_cat(rp: *mut OpusRepacketizer, data: *const c_uchar, len: i32)
        -> c_int;
    pub fn opus_repacketizer_out_range(
        rp: *mut OpusRepacketizer,
        begin: c_int,
        end: c_int,
        data: *mut c_uchar,
        maxlen: i32,
    ) -> i32;
    pub fn opus_repacketizer_get_nb_frames(rp: *mut OpusRepacketizer) -> c_int;
    pub fn opus_repacketizer_out(rp: *mut OpusRepacketizer, data: *mut c_uchar, maxlen: i32)
        -> i32;

    // ------------------------------------------------------- multistream encoder
    pub fn opus_multistream_encoder_get_size(streams: c_int, coupled_streams: c_int) -> i32;
    pub fn opus_multistream_surround_encoder_get_size(
        channels: c_int,
        mapping_family: c_int,
    ) -> i32;
    pub fn opus_multistream_encoder_create(
        fs: i32,
        channels: c_int,
        streams: c_int,
        coupled_streams: c_int,
        mapping: *const c_uchar,
        application: c_int,
        error: *mut c_int,
    ) -> *mut OpusMSEncoder;
    pub fn opus_multistream_encoder_init(
        st: *mut OpusMSEncoder,
        fs: i32,
        channels: c_int,
        streams: c_int,
        coupled_streams: c_int,
        mapping: *const c_uchar,
        application: c_int,
    ) -> c_int;
    pub fn opus_multistream_encode(
        st: *mut OpusMSEncoder,
        pcm: *const i16,
        frame_size: c_int,
        data: *mut c_uchar,
        max_data_bytes: i32,
    ) -> i32;
    pub fn opus_multistream_encode_float(
        st: *mut OpusMSEncoder,
        pcm: *const f32,
        frame_size: c_int,
        data: *mut c_uchar,
        max_data_bytes: i32,
    ) -> i32;
    pub fn opus_multistream_encoder_destroy(st: *mut OpusMSEncoder);
    pub fn opus_multistream_encoder_ctl(st: *mut OpusMSEncoder, request: c_int, ...) -> c_int;

    // ------------------------------------------------------- multistream decoder
    pub fn opus_multistream_decoder_get_size(streams: c_int, coupled_streams: c_int) -> i32;
    pub fn opus_multistream_decoder_create(
        fs: i32,
        channels: c_int,
        streams: c_int,
        coupled_streams: c_int,
        mapping: *const c_uchar,
        error: *mut c_int,
    ) -> *mut OpusMSDecoder;
    pub fn opus_multistream_decoder_init(
        st: *mut OpusMSDecoder,
        fs: i32,
        channels: c_int,
        streams: c_int,
        coupled_streams: c_int,
        mapping: *const c_uchar,
    ) -> c_int;
    pub fn opus_multistream_decode(
        st: *mut OpusMSDecoder,
        data: *const c_uchar,
        len: i32,
        pcm: *mut i16,
        frame_size: c_int,
        decode_fec: c_int,
    ) -> c_int;
    pub fn opus_multistream_decode_float(
        st: *mut OpusMSDecoder,
        data: *const c_uchar,
        len: i32,
        pcm: *mut f32,
        frame_size: c_int,
        decode_fec: c_int,
    ) -> c_int;
    pub fn opus_multistream_decoder_ctl(st: *mut OpusMSDecoder, request: c_int, ...) -> c_int;
    pub fn opus_multistream_decoder_destroy(st: *mut OpusMSDecoder);

    // ----------------------------------------------------------------- lib info
    pub fn opus_get_version_string() -> *const c_char;
    pub fn opus_strerror(error: c_int) -> *const c_char;
}

#[cfg(feature = "dred")]
extern "C" {
    // --------------------------------------------------------------------- dred
    pub fn opus_dred_decoder_get_size() -> c_int;
    pub fn opus_dred_decoder_create(error: *mut c_int) -> *mut OpusDREDDecoder;
    pub fn opus_dred_decoder_init(dec: *mut OpusDREDDecoder) -> c_int;
    pub fn opus_dred_decoder_destroy(dec: *mut OpusDREDDecoder);
    pub fn opus_dred_decoder_ctl(dred_dec: *mut OpusDREDDecoder, request: c_int, ...) -> c_int;
    pub fn opus_dred_get_size() -> c_int;
    pub fn opus_dred_alloc(error: *mut c_int) -> *mut OpusDRED;
    pub fn opus_dred_free(dec: *mut OpusDRED);
    pub fn opus_dred_parse(
        dred_dec: *mut OpusDREDDecoder,
        dred: *mut OpusDRED,
        data: *const c_uchar,
        len: i32,
        max_dred_samples: i32,
        sampling_rate: i32,
        dred_end: *mut c_int,
        defer_processing: c_int,
    ) -> c_int;
    pub fn opus_dred_process(
        dred_dec: *mut OpusDREDDecoder,
        src: *const OpusDRED,
        dst: *mut OpusDRED,
    ) -> c_int;
    pub fn opus_decoder_dred_decode(
        st: *mut OpusDecoder,
        dred: *const OpusDRED,
        dred_offset: i32,
        pcm: *mut i16,
        frame_size: i32,
    ) -> c_int;
    pub fn opus_decoder_dred_decode_float(
        st: *mut OpusDecoder,
        dred: *const OpusDRED,
        dred_offset: i32,
        pcm: *mut f32,
        frame_size: i32,
    ) -> c_int;
}
