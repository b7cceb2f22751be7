use opuslink::{Application, Bitrate, Channels, Decoder, Encoder, ErrorCode, Repacketizer};

fn check_ascii(s: &str) -> &str {
    for &b in s.as_bytes() {
        assert!(b < 0x80, "Non-ASCII character in string");
        assert!(b > 0x00, "NUL in string")
    }
    std::str::from_utf8(s.as_bytes()).unwrap()
}

#[test]
fn strings_ascii() {
    println!("\nVersion: {}", check_ascii(opuslink::version()));
    assert!(opuslink::version().starts_with("libopus"));

    for code in -8..=0 {
        let msg = opuslink::strerror(code);
        assert!(!check_ascii(msg).is_empty());
    }

    let codes = [
        ErrorCode::BadArg,
        ErrorCode::BufferTooSmall,
        ErrorCode::InternalError,
        ErrorCode::InvalidPacket,
        ErrorCode::Unimplemented,
        ErrorCode::InvalidState,
        ErrorCode::AllocFail,
        ErrorCode::Unknown,
        ErrorCode::Disposed,
    ];
    for &code in codes.iter() {
        println!("{:?}: {}", code, check_ascii(code.description()));
    }
}

// 48000Hz * 1 channel * 20 ms / 1000 = 960
const MONO_20MS: usize = 48000 * 20 / 1000;

#[test]
fn encode_mono() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Audio).unwrap();

    let mut output = [0; 256];
    let len = encoder.encode(&[0_i16; MONO_20MS], &mut output).unwrap();
    assert_eq!(&output[..len], &[248, 255, 254]);

    let len = encoder.encode(&[0_i16; MONO_20MS], &mut output).unwrap();
    assert_eq!(&output[..len], &[248, 255, 254]);

    let len = encoder.encode(&[1_i16; MONO_20MS], &mut output).unwrap();
    assert!(len > 3);

    let myvec = encoder.encode_vec(&[1_i16; MONO_20MS], output.len()).unwrap();
    assert!(myvec.len() > 3 && myvec.len() <= output.len());
}

#[test]
fn encode_stereo() {
    let mut encoder = Encoder::new(48000, Channels::Stereo, Application::Audio).unwrap();

    let mut output = [0; 512];
    let len = encoder.encode(&[0_i16; 2 * MONO_20MS], &mut output).unwrap();
    assert_eq!(&output[..len], &[252, 255, 254]);

    let len = encoder.encode(&[17_i16; 2 * MONO_20MS], &mut output).unwrap();
    assert!(len > 3);

    // Very small buffer should still succeed; the buffer caps the bitrate.
    let len = encoder.encode(&[95_i16; 2 * MONO_20MS], &mut [0; 20]).unwrap();
    assert!(len <= 20);

    let myvec = encoder.encode_vec(&[95_i16; 2 * MONO_20MS], 20).unwrap();
    assert!(myvec.len() <= 20);
}

#[test]
fn encode_decode_stereo() {
    let mut encoder = Encoder::new(48000, Channels::Stereo, Application::Voip).unwrap();
    let mut decoder = Decoder::new(48000, Channels::Stereo).unwrap();
    let mut pcm = vec![17_i16; MONO_20MS * 2];
    pcm[1] = 1;

    let mut encoded = vec![0; 1500];
    let size = encoder.encode(&pcm, &mut encoded).unwrap();
    let packet = &encoded[..size];

    // nb_samples() returns the count per channel.
    assert_eq!(MONO_20MS, decoder.nb_samples(packet).unwrap());
    assert_eq!(MONO_20MS, opuslink::packet::get_nb_samples(packet, 48000).unwrap());
    assert_eq!(1, opuslink::packet::get_nb_frames(packet).unwrap());
    assert_eq!(
        Channels::Stereo,
        opuslink::packet::get_nb_channels(packet).unwrap()
    );
    assert_eq!(
        MONO_20MS,
        opuslink::packet::get_samples_per_frame(packet, 48000).unwrap()
    );

    let mut output = vec![0i16; MONO_20MS * 2];
    // decode() returns the count per channel as well.
    assert_eq!(MONO_20MS, decoder.decode(packet, &mut output, false).unwrap());
}

#[test]
fn encode_float_decode_float() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Audio).unwrap();
    let mut decoder = Decoder::new(48000, Channels::Mono).unwrap();

    let pcm = vec![0.01_f32; MONO_20MS];
    let mut packet = vec![0u8; 1500];
    let len = encoder.encode_float(&pcm, &mut packet).unwrap();
    assert!(len > 0);

    let mut output = vec![0f32; MONO_20MS];
    assert_eq!(
        MONO_20MS,
        decoder.decode_float(&packet[..len], &mut output, false).unwrap()
    );
}

#[test]
fn construction_matrix() {
    for &rate in &[8000u32, 12000, 16000, 24000, 48000] {
        for &channels in &[Channels::Mono, Channels::Stereo] {
            let encoder = Encoder::new(rate, channels, Application::Audio).unwrap();
            assert!(encoder.is_open());
            let decoder = Decoder::new(rate, channels).unwrap();
            assert!(decoder.is_open());
        }
    }
    assert_eq!(
        ErrorCode::BadArg,
        Encoder::new(44100, Channels::Mono, Application::Audio)
            .unwrap_err()
            .code()
    );
    assert_eq!(
        ErrorCode::BadArg,
        Decoder::new(0, Channels::Stereo).unwrap_err().code()
    );
}

#[test]
fn encode_bad_rate() {
    match Encoder::new(48001, Channels::Mono, Application::Audio) {
        Ok(_) => panic!("Encoder::new did not return BadArg"),
        Err(err) => assert_eq!(err.code(), ErrorCode::BadArg),
    }
}

#[test]
fn encode_bad_buffer() {
    let mut encoder = Encoder::new(48000, Channels::Stereo, Application::Audio).unwrap();
    match encoder.encode(&[1_i16; 2 * MONO_20MS], &mut [0; 0]) {
        Ok(_) => panic!("encode with 0-length buffer did not return BadArg"),
        Err(err) => assert_eq!(err.code(), ErrorCode::BadArg),
    }
}

#[test]
fn encode_bad_frame_size() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Audio).unwrap();
    // 961 samples is no legal frame duration at 48 kHz.
    let err = encoder
        .encode(&[0_i16; MONO_20MS + 1], &mut [0; 256])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
}

#[test]
fn voip_scenario_roundtrip() {
    let mut encoder = Encoder::new(48000, Channels::Stereo, Application::Voip).unwrap();
    let pcm = vec![0_i16; 2 * 960];
    let mut packet = vec![0u8; 4000];
    let len = encoder.encode(&pcm, &mut packet).unwrap();
    assert!(len > 0 && len <= 4000);

    let mut decoder = Decoder::new(48000, Channels::Stereo).unwrap();
    let mut output = vec![0i16; 2 * 960];
    assert_eq!(960, decoder.decode(&packet[..len], &mut output, false).unwrap());
}

// ============================================================================
// CTL round trips

#[test]
fn encoder_ctl_round_trips() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Voip).unwrap();

    encoder.set_bitrate(Bitrate::Bits(48000)).unwrap();
    assert_eq!(Bitrate::Bits(48000), encoder.bitrate().unwrap());
    // Max and Auto are write-side values; reads report the effective rate.
    encoder.set_bitrate(Bitrate::Max).unwrap();
    encoder.set_bitrate(Bitrate::Auto).unwrap();
    assert!(matches!(encoder.bitrate().unwrap(), Bitrate::Bits(_)));

    encoder.set_complexity(7).unwrap();
    assert_eq!(7, encoder.complexity().unwrap());

    encoder.set_vbr(false).unwrap();
    assert!(!encoder.vbr().unwrap());
    encoder.set_vbr(true).unwrap();
    assert!(encoder.vbr().unwrap());

    encoder.set_inband_fec(true).unwrap();
    assert!(encoder.inband_fec().unwrap());

    encoder.set_packet_loss_perc(25).unwrap();
    assert_eq!(25, encoder.packet_loss_perc().unwrap());

    encoder.set_dtx(true).unwrap();
    assert!(encoder.dtx().unwrap());

    encoder.set_lsb_depth(16).unwrap();
    assert_eq!(16, encoder.lsb_depth().unwrap());

    encoder
        .set_application(opuslink::Application::Audio)
        .unwrap();
    assert_eq!(Application::Audio, encoder.application().unwrap());

    encoder.set_signal(opuslink::Signal::Voice).unwrap();
    assert_eq!(opuslink::Signal::Voice, encoder.signal().unwrap());

    encoder
        .set_force_channels(Some(Channels::Mono))
        .unwrap();
    assert_eq!(Some(Channels::Mono), encoder.force_channels().unwrap());
    encoder.set_force_channels(None).unwrap();
    assert_eq!(None, encoder.force_channels().unwrap());

    encoder
        .set_expert_frame_duration(opuslink::FrameDuration::Ms20)
        .unwrap();
    assert_eq!(
        opuslink::FrameDuration::Ms20,
        encoder.expert_frame_duration().unwrap()
    );

    assert_eq!(48000, encoder.sample_rate().unwrap());
    assert!(encoder.lookahead().unwrap() > 0);

    encoder.reset_state().unwrap();
    // Configuration survives a state reset.
    assert_eq!(7, encoder.complexity().unwrap());
}

#[test]
fn out_of_range_ctl_leaves_value() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Voip).unwrap();

    encoder.set_complexity(7).unwrap();
    let err = encoder.set_complexity(11).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
    assert_eq!(7, encoder.complexity().unwrap());

    encoder.set_packet_loss_perc(10).unwrap();
    let err = encoder.set_packet_loss_perc(101).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
    assert_eq!(10, encoder.packet_loss_perc().unwrap());

    let err = encoder.set_lsb_depth(7).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
}

#[test]
fn decoder_ctl_round_trips() {
    let mut decoder = Decoder::new(48000, Channels::Mono).unwrap();

    decoder.set_gain(100).unwrap();
    assert_eq!(100, decoder.gain().unwrap());

    let err = decoder.set_gain(40000).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
    assert_eq!(100, decoder.gain().unwrap());

    assert_eq!(48000, decoder.sample_rate().unwrap());

    decoder.set_phase_inversion_disabled(true).unwrap();
    assert!(decoder.phase_inversion_disabled().unwrap());

    decoder.reset_state().unwrap();
    assert_eq!(100, decoder.gain().unwrap());
}

#[test]
fn raw_ctl_access() {
    let mut encoder = Encoder::new(24000, Channels::Mono, Application::Audio).unwrap();
    assert_eq!(
        24000,
        encoder.ctl_get(opuslink::ctl::generic::GET_SAMPLE_RATE).unwrap()
    );
    encoder
        .ctl_set(opuslink::ctl::encoder::SET_COMPLEXITY, 3)
        .unwrap();
    assert_eq!(3, encoder.complexity().unwrap());
    encoder
        .ctl_request(opuslink::ctl::generic::RESET_STATE)
        .unwrap();
}

#[test]
fn mismatched_ctl_family_is_surfaced() {
    // An encoder-only request on a decoder session is answered with an
    // error by the library, not ignored.
    let mut decoder = Decoder::new(48000, Channels::Mono).unwrap();
    let err = decoder
        .ctl_set(opuslink::ctl::encoder::SET_APPLICATION, 2048)
        .unwrap_err();
    assert!(!err.is_disposed());
}

// ============================================================================
// Disposal

#[test]
fn closed_encoder_rejects_everything() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Voip).unwrap();
    assert!(encoder.is_open());

    encoder.close();
    assert!(!encoder.is_open());

    let err = encoder.encode(&[0_i16; MONO_20MS], &mut [0; 256]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Disposed);
    assert!(err.is_disposed());

    // The strict policy applies to property access too.
    assert!(encoder.bitrate().unwrap_err().is_disposed());
    assert!(encoder.set_complexity(5).unwrap_err().is_disposed());
    assert!(encoder.reset_state().unwrap_err().is_disposed());

    // Closing again is a no-op.
    encoder.close();
    assert!(!encoder.is_open());
}

#[test]
fn closed_decoder_rejects_everything() {
    let mut decoder = Decoder::new(48000, Channels::Stereo).unwrap();
    decoder.close();

    let err = decoder.decode(&[], &mut [0i16; 2 * MONO_20MS], false).unwrap_err();
    assert!(err.is_disposed());
    assert!(decoder.gain().unwrap_err().is_disposed());
    assert!(decoder.nb_samples(&[252, 255, 254]).unwrap_err().is_disposed());
    decoder.close();
}

// ============================================================================
// Packets

#[test]
fn packet_inspection() {
    let mut encoder = Encoder::new(48000, Channels::Stereo, Application::Audio).unwrap();
    let mut buf = vec![0u8; 1500];
    let len = encoder.encode(&[13_i16; 2 * MONO_20MS], &mut buf).unwrap();
    let packet = &buf[..len];

    opuslink::packet::get_bandwidth(packet).unwrap();

    let parsed = opuslink::packet::parse(packet).unwrap();
    assert_eq!(1, parsed.frames.len());
    assert_eq!(packet[0], parsed.toc);
    assert!(parsed.payload_offset >= 1);
    assert_eq!(len - parsed.payload_offset, parsed.frames[0].len());
}

#[test]
fn packet_inspection_rejects_empty() {
    assert_eq!(
        ErrorCode::BadArg,
        opuslink::packet::get_bandwidth(&[]).unwrap_err().code()
    );
    assert_eq!(
        ErrorCode::BadArg,
        opuslink::packet::get_nb_channels(&[]).unwrap_err().code()
    );
    assert_eq!(
        ErrorCode::BadArg,
        opuslink::packet::get_samples_per_frame(&[], 48000)
            .unwrap_err()
            .code()
    );
}

#[test]
fn pad_and_unpad() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Audio).unwrap();
    let mut buf = vec![0u8; 1500];
    let len = encoder.encode(&[23_i16; MONO_20MS], &mut buf).unwrap();

    let mut padded = buf[..len].to_vec();
    padded.resize(len + 64, 0);
    opuslink::packet::pad(&mut padded, len).unwrap();
    assert_eq!(1, opuslink::packet::get_nb_frames(&padded).unwrap());

    // A padded packet still decodes to the same duration.
    let mut decoder = Decoder::new(48000, Channels::Mono).unwrap();
    let mut output = vec![0i16; MONO_20MS];
    assert_eq!(MONO_20MS, decoder.decode(&padded, &mut output, false).unwrap());

    let new_len = opuslink::packet::unpad(&mut padded).unwrap();
    assert!(new_len <= len + 64);
    assert!(new_len >= 1);
}

#[test]
fn repacketizer() {
    let mut rp = Repacketizer::new().unwrap();
    let mut out = [0; 256];

    for _ in 0..2 {
        let packet1 = [249, 255, 254, 255, 254];
        let packet2 = [248, 255, 254];

        let mut state = rp.begin().unwrap();
        state.cat(&packet1).unwrap();
        state.cat(&packet2).unwrap();
        assert_eq!(3, state.get_nb_frames());
        let len = state.out(&mut out).unwrap();
        assert_eq!(&out[..len], &[251, 3, 255, 254, 255, 254, 255, 254]);
    }
    for _ in 0..2 {
        let packet = [248, 255, 254];
        let state = rp.begin().unwrap().cat_move(&packet).unwrap();
        let packet = [249, 255, 254, 255, 254];
        let state = state.cat_move(&packet).unwrap();
        let len = { state }.out(&mut out).unwrap();
        assert_eq!(&out[..len], &[251, 3, 255, 254, 255, 254, 255, 254]);
    }
    for _ in 0..2 {
        let len = rp
            .combine(&[&[249, 255, 254, 255, 254], &[248, 255, 254]], &mut out)
            .unwrap();
        assert_eq!(&out[..len], &[251, 3, 255, 254, 255, 254, 255, 254]);
    }
    for _ in 0..2 {
        let len = rp
            .begin()
            .unwrap()
            .cat_move(&[248, 255, 254])
            .unwrap()
            .cat_move(&[248, 71, 71])
            .unwrap()
            .out(&mut out)
            .unwrap();
        assert_eq!(&out[..len], &[249, 255, 254, 71, 71]);
    }
}

#[test]
fn repacketizer_out_range() {
    let mut rp = Repacketizer::new().unwrap();
    let mut out = [0; 256];

    let mut state = rp.begin().unwrap();
    state.cat(&[248, 255, 254]).unwrap();
    state.cat(&[248, 71, 71]).unwrap();
    state.cat(&[248, 13, 13]).unwrap();
    assert_eq!(3, state.get_nb_frames());

    // A single-frame range reproduces the submitted packet.
    let len = state.out_range(1, 2, &mut out).unwrap();
    assert_eq!(&out[..len], &[248, 71, 71]);

    let err = state.out_range(2, 9, &mut out).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArg);
}

#[test]
fn closed_repacketizer_rejects_begin() {
    let mut rp = Repacketizer::new().unwrap();
    rp.close();
    assert!(!rp.is_open());
    assert!(rp.begin().unwrap_err().is_disposed());
    rp.close();
}

// ============================================================================
// Soft clip

#[test]
fn soft_clip_tames_overdrive() {
    let mut clip = opuslink::SoftClip::new(Channels::Stereo);
    let mut signal = vec![1.5_f32; 2 * MONO_20MS];
    clip.apply(&mut signal);
    assert!(signal.iter().all(|&x| (-1.0..=1.0).contains(&x)));
}
