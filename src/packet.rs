//! Analysis and rewriting of raw packets, without a coder session.
//!
//! The inspection functions read the table-of-contents byte and framing of a
//! packet; the pad/unpad functions rewrite a packet in place. None of them
//! touch coder state.

use std::{ptr, slice};

use libc::c_int;

use crate::error::{check, Error, Result};
use crate::ffi;
use crate::{Bandwidth, Channels};

/// The bandpass the packet was coded with.
pub fn get_bandwidth(packet: &[u8]) -> Result<Bandwidth> {
    if packet.is_empty() {
        return Err(Error::native("opus_packet_get_bandwidth", ffi::OPUS_BAD_ARG));
    }
    let bandwidth = unsafe { ffi::opus_packet_get_bandwidth(packet.as_ptr()) };
    let bandwidth = check("opus_packet_get_bandwidth", bandwidth)?;
    Bandwidth::from_raw(bandwidth, "opus_packet_get_bandwidth")
}

/// The channel count the packet was coded with.
pub fn get_nb_channels(packet: &[u8]) -> Result<Channels> {
    if packet.is_empty() {
        return Err(Error::native(
            "opus_packet_get_nb_channels",
            ffi::OPUS_BAD_ARG,
        ));
    }
    let channels = unsafe { ffi::opus_packet_get_nb_channels(packet.as_ptr()) };
    let channels = check("opus_packet_get_nb_channels", channels)?;
    match channels {
        1 => Ok(Channels::Mono),
        2 => Ok(Channels::Stereo),
        _ => Err(Error::native(
            "opus_packet_get_nb_channels",
            ffi::OPUS_BAD_ARG,
        )),
    }
}

/// The number of frames in the packet.
pub fn get_nb_frames(packet: &[u8]) -> Result<usize> {
    let frames = unsafe { ffi::opus_packet_get_nb_frames(packet.as_ptr(), packet.len() as i32) };
    let frames = check("opus_packet_get_nb_frames", frames)?;
    Ok(frames as usize)
}

/// The number of samples per channel the packet decodes to at `sample_rate`.
pub fn get_nb_samples(packet: &[u8], sample_rate: u32) -> Result<usize> {
    let samples = unsafe {
        ffi::opus_packet_get_nb_samples(packet.as_ptr(), packet.len() as i32, sample_rate as i32)
    };
    let samples = check("opus_packet_get_nb_samples", samples)?;
    Ok(samples as usize)
}

/// The number of samples per channel of a single frame at `sample_rate`.
pub fn get_samples_per_frame(packet: &[u8], sample_rate: u32) -> Result<usize> {
    if packet.is_empty() {
        return Err(Error::native(
            "opus_packet_get_samples_per_frame",
            ffi::OPUS_BAD_ARG,
        ));
    }
    let samples =
        unsafe { ffi::opus_packet_get_samples_per_frame(packet.as_ptr(), sample_rate as i32) };
    let samples = check("opus_packet_get_samples_per_frame", samples)?;
    Ok(samples as usize)
}

/// A parsed view of one packet: the TOC byte plus borrowed slices of its
/// frames.
pub struct Packet<'a> {
    pub toc: u8,
    pub frames: Vec<&'a [u8]>,
    pub payload_offset: usize,
}

/// Splits a packet into its frames without copying them.
pub fn parse(packet: &[u8]) -> Result<Packet<'_>> {
    let mut toc: u8 = 0;
    // A packet holds at most 48 frames (120 ms of 2.5 ms frames).
    let mut frames = [ptr::null(); 48];
    let mut sizes = [0i16; 48];
    let mut payload_offset: c_int = 0;
    let num_frames = unsafe {
        ffi::opus_packet_parse(
            packet.as_ptr(),
            packet.len() as i32,
            &mut toc,
            frames.as_mut_ptr(),
            sizes.as_mut_ptr(),
            &mut payload_offset,
        )
    };
    let num_frames = check("opus_packet_parse", num_frames)?;

    let mut frames_vec = Vec::with_capacity(num_frames as usize);
    for i in 0..num_frames as usize {
        frames_vec.push(unsafe { slice::from_raw_parts(frames[i], sizes[i] as usize) });
    }

    Ok(Packet {
        toc,
        frames: frames_vec,
        payload_offset: payload_offset as usize,
    })
}

/// Grows the packet occupying the first `prev_len` bytes of `packet` to fill
/// the whole buffer with padding.
pub fn pad(packet: &mut [u8], prev_len: usize) -> Result<()> {
    let result = unsafe {
        ffi::opus_packet_pad(packet.as_mut_ptr(), prev_len as i32, packet.len() as i32)
    };
    check("opus_packet_pad", result)?;
    Ok(())
}

/// Strips padding in place; returns the unpadded length.
pub fn unpad(packet: &mut [u8]) -> Result<usize> {
    let result = unsafe { ffi::opus_packet_unpad(packet.as_mut_ptr(), packet.len() as i32) };
    let result = check("opus_packet_unpad", result)?;
    Ok(result as usize)
}

/// [`pad`] for a multistream packet of `nb_streams` streams.
pub fn multistream_pad(packet: &mut [u8], prev_len: usize, nb_streams: usize) -> Result<()> {
    let result = unsafe {
        ffi::opus_multistream_packet_pad(
            packet.as_mut_ptr(),
            prev_len as i32,
            packet.len() as i32,
            nb_streams as c_int,
        )
    };
    check("opus_multistream_packet_pad", result)?;
    Ok(())
}

/// [`unpad`] for a multistream packet of `nb_streams` streams.
pub fn multistream_unpad(packet: &mut [u8], nb_streams: usize) -> Result<usize> {
    let result = unsafe {
        ffi::opus_multistream_packet_unpad(
            packet.as_mut_ptr(),
            packet.len() as i32,
            nb_streams as c_int,
        )
    };
    let result = check("opus_multistream_packet_unpad", result)?;
    Ok(result as usize)
}
