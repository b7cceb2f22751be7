//! Multistream sessions: stereo carried as two elementary streams.

use opuslink::{
    Application, Bitrate, ErrorCode, MultistreamDecoder, MultistreamEncoder,
};

const FRAME: usize = 960; // 20 ms at 48 kHz

fn stereo_pair() -> (MultistreamEncoder, MultistreamDecoder) {
    // Two channels as two uncoupled mono streams, identity mapping.
    let encoder =
        MultistreamEncoder::new(48000, 2, 2, 0, &[0, 1], Application::Audio).unwrap();
    let decoder = MultistreamDecoder::new(48000, 2, 2, 0, &[0, 1]).unwrap();
    (encoder, decoder)
}

#[test]
fn encode_decode_roundtrip() {
    let (mut encoder, mut decoder) = stereo_pair();

    let pcm = vec![11_i16; 2 * FRAME];
    let mut packet = vec![0u8; 4000];
    let len = encoder.encode(&pcm, &mut packet).unwrap();
    assert!(len > 0 && len <= 4000);

    let mut output = vec![0i16; 2 * FRAME];
    assert_eq!(FRAME, decoder.decode(&packet[..len], &mut output, false).unwrap());
}

#[test]
fn float_roundtrip_and_loss() {
    let (mut encoder, mut decoder) = stereo_pair();

    let pcm = vec![0.02_f32; 2 * FRAME];
    let mut packet = vec![0u8; 4000];
    let len = encoder.encode_float(&pcm, &mut packet).unwrap();
    assert!(len > 0);

    let mut output = vec![0f32; 2 * FRAME];
    assert_eq!(
        FRAME,
        decoder.decode_float(&packet[..len], &mut output, false).unwrap()
    );

    // Concealment through the multistream path.
    assert_eq!(FRAME, decoder.decode_float(&[], &mut output, false).unwrap());
}

#[test]
fn mapping_table_must_cover_all_channels() {
    let err = MultistreamEncoder::new(48000, 2, 2, 0, &[0], Application::Audio).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);

    let err = MultistreamDecoder::new(48000, 2, 2, 0, &[0, 1, 2]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
}

#[test]
fn invalid_stream_layout_is_native_bad_arg() {
    // More coupled streams than streams; the native layer rejects it.
    let err = MultistreamEncoder::new(48000, 2, 1, 2, &[0, 1], Application::Audio).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
}

#[test]
fn ctl_round_trips() {
    let (mut encoder, mut decoder) = stereo_pair();

    encoder.set_bitrate(Bitrate::Bits(96000)).unwrap();
    assert_eq!(Bitrate::Bits(96000), encoder.bitrate().unwrap());

    encoder.set_complexity(4).unwrap();
    assert_eq!(4, encoder.complexity().unwrap());

    assert_eq!(48000, encoder.sample_rate().unwrap());
    assert_eq!(48000, decoder.sample_rate().unwrap());

    decoder.set_gain(-100).unwrap();
    assert_eq!(-100, decoder.gain().unwrap());

    encoder.reset_state().unwrap();
    decoder.reset_state().unwrap();
    assert_eq!(4, encoder.complexity().unwrap());
}

#[test]
fn substream_state_access() {
    let (mut encoder, mut decoder) = stereo_pair();

    let pcm = vec![31_i16; 2 * FRAME];
    let mut packet = vec![0u8; 4000];
    encoder.encode(&pcm, &mut packet).unwrap();

    encoder.stream_state(0).unwrap().final_range().unwrap();
    encoder
        .stream_state(1)
        .unwrap()
        .set_bitrate(Bitrate::Bits(24000))
        .unwrap();

    // Streams are numbered; past the end is a native error, not a crash.
    let err = encoder.stream_state(2).unwrap_err();
    assert!(!err.is_disposed());

    decoder.stream_state(0).unwrap().set_gain(50).unwrap();
    assert!(decoder.stream_state(5).is_err());
}

#[test]
fn multistream_pad_and_unpad() {
    let (mut encoder, mut decoder) = stereo_pair();

    let pcm = vec![7_i16; 2 * FRAME];
    let mut buf = vec![0u8; 4000];
    let len = encoder.encode(&pcm, &mut buf).unwrap();

    let mut padded = buf[..len].to_vec();
    padded.resize(len + 48, 0);
    opuslink::packet::multistream_pad(&mut padded, len, 2).unwrap();

    let mut output = vec![0i16; 2 * FRAME];
    assert_eq!(FRAME, decoder.decode(&padded, &mut output, false).unwrap());

    let new_len = opuslink::packet::multistream_unpad(&mut padded, 2).unwrap();
    assert!(new_len >= 1 && new_len <= len + 48);
}

#[test]
fn closed_sessions_reject_use() {
    let (mut encoder, mut decoder) = stereo_pair();

    encoder.close();
    assert!(!encoder.is_open());
    let err = encoder
        .encode(&[0_i16; 2 * FRAME], &mut [0u8; 256])
        .unwrap_err();
    assert!(err.is_disposed());
    assert!(encoder.bitrate().unwrap_err().is_disposed());
    assert!(encoder.stream_state(0).unwrap_err().is_disposed());
    encoder.close();

    decoder.close();
    let err = decoder.decode(&[], &mut [0i16; 2 * FRAME], false).unwrap_err();
    assert!(err.is_disposed());
}
