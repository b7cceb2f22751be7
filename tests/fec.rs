//! Loss concealment and forward error correction paths.

use opuslink::{Application, Channels, Decoder, Encoder};

#[test]
fn empty_packet_runs_concealment() {
    let mut decoder = Decoder::new(48000, Channels::Mono).unwrap();

    let mut output = vec![0i16; 5760];
    let size = decoder.decode(&[], &mut output[..], true).unwrap();
    assert_eq!(size, 5760);
}

#[test]
fn concealment_never_reports_invalid_packet() {
    let mut decoder = Decoder::new(48000, Channels::Stereo).unwrap();

    // 20 ms of loss, a legal concealment duration.
    let mut output = vec![0i16; 2 * 960];
    let size = decoder.decode(&[], &mut output, false).unwrap();
    assert_eq!(size, 960);
    assert_eq!(960, decoder.last_packet_duration().unwrap());
}

#[test]
fn fec_recovers_dropped_packet_duration() {
    let mut encoder = Encoder::new(48000, Channels::Mono, Application::Voip).unwrap();
    encoder.set_inband_fec(true).unwrap();
    encoder.set_packet_loss_perc(30).unwrap();
    encoder.set_bitrate(opuslink::Bitrate::Bits(32000)).unwrap();

    // A changing signal so FEC actually has something to protect.
    let frame: Vec<i16> = (0..960).map(|i| ((i % 320) * 40) as i16).collect();

    let mut packets = Vec::new();
    for _ in 0..6 {
        let mut buf = vec![0u8; 1500];
        let len = encoder.encode(&frame, &mut buf).unwrap();
        buf.truncate(len);
        packets.push(buf);
    }

    let mut decoder = Decoder::new(48000, Channels::Mono).unwrap();
    let mut output = vec![0i16; 960];

    // Drop packet 3; ask packet 4 for its in-band recovery data first.
    for (i, packet) in packets.iter().enumerate() {
        if i == 3 {
            continue;
        }
        if i == 4 {
            let recovered = decoder.decode(packet, &mut output, true).unwrap();
            assert_eq!(960, recovered);
        }
        let decoded = decoder.decode(packet, &mut output, false).unwrap();
        assert_eq!(960, decoded);
    }
}
