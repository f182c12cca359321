/*
 *  tests/send_pipeline.rs
 *
 *  End-to-end pipeline tests: media/text -> payload -> packets -> link
 *
 *  Pixbeam - pixels over the air
 *  (c) 2020-26 Stuart Hunter
 */

use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb888;

use pixbeam::marquee::text_animation;
use pixbeam::normalize::normalize_media;
use pixbeam::payload::encode_animation;
use pixbeam::protocol::{frame_payload, PACKET_HEADER_LEN};
use pixbeam::{
    BeamError, Device, DiscoveredDevice, GifPayload, MemoryLink, TransferSession, Transport,
};

fn panel() -> DiscoveredDevice {
    DiscoveredDevice {
        name: "IDM-TEST01".into(),
        address: "AA:BB:CC:DD:EE:FF".into(),
        rssi: -60,
    }
}

fn connected_link() -> MemoryLink {
    MemoryLink::new().with_nearby(vec![panel()])
}

#[tokio::test]
async fn text_pipeline_reaches_the_link_intact() {
    let mut device = Device::new(connected_link()).with_pacing(Duration::ZERO);
    device.connect("AA:BB:CC:DD:EE:FF").await.unwrap();

    // long enough to scroll: the payload spans multiple frames
    let receipt = device
        .show_text("HELLO PANEL", Rgb888::new(0, 200, 255))
        .await
        .unwrap();
    assert!(receipt.chunks_written() >= 1);
    assert!(receipt.bytes_written() > receipt.chunks_written() * PACKET_HEADER_LEN);
}

#[tokio::test]
async fn framed_chunks_reassemble_into_the_payload() {
    let animation = text_animation("REASSEMBLY CHECK", Rgb888::new(255, 255, 255)).unwrap();
    let payload = encode_animation(&animation).unwrap();

    let mut link = MemoryLink::new();
    link.connect("AA:BB:CC:DD:EE:FF").await.unwrap();
    TransferSession::new(&payload)
        .with_pacing(Duration::ZERO)
        .run(&mut link)
        .await
        .unwrap();

    let rebuilt: Vec<u8> = link
        .writes()
        .iter()
        .flat_map(|p| p[PACKET_HEADER_LEN..].iter().copied())
        .collect();
    assert_eq!(payload.bytes(), rebuilt.as_slice());

    // first chunk opens the transfer, the rest continue it
    for (index, packet) in link.writes().iter().enumerate() {
        let expected = if index == 0 { 0x00 } else { 0x02 };
        assert_eq!(expected, packet[4], "chunk {index}");
    }
}

#[tokio::test]
async fn gif_source_round_trips_through_normalization() {
    // a small animated source: two 8x8 frames, 100ms each
    let mut source = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut source, 8, 8, &[]).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for shade in [0u8, 255] {
            let rgb = vec![shade; 8 * 8 * 3];
            let mut frame = gif::Frame::from_rgb(8, 8, &rgb);
            frame.delay = 10;
            encoder.write_frame(&frame).unwrap();
        }
    }

    let animation = normalize_media(&source).unwrap();
    assert_eq!(2, animation.frame_count());

    let payload = encode_animation(&animation).unwrap();
    let packets = frame_payload(&payload);
    assert_eq!(payload.len().div_ceil(4096), packets.len());

    // total_length field is payload + 32 in every packet
    let expected = ((payload.len() + 32) as u32).to_le_bytes();
    for packet in &packets {
        assert_eq!(expected, packet[5..9]);
    }
}

#[tokio::test]
async fn transfer_against_dead_link_never_writes() {
    let payload = GifPayload::from_bytes(vec![0x47; 256]);
    let mut link = MemoryLink::new();

    let result = TransferSession::new(&payload)
        .with_pacing(Duration::ZERO)
        .run(&mut link)
        .await;

    assert!(matches!(result, Err(BeamError::NotConnected)));
    assert!(link.writes().is_empty());
}
