//! Scripted events through the full adapter pipeline and onto the wire.

use std::io::Read;
use std::os::unix::net::UnixListener;

use bthid_capture::capture::mock::ScriptedSource;
use bthid_capture::capture::InputEvent;
use bthid_capture::keyboard::KeyboardPipeline;
use bthid_capture::mouse::MousePipeline;
use bthid_capture::BrokerClient;
use bthid_core::protocol::{decode_frame, ReportFrame};

fn read_frames(stream: &mut impl Read, expected: usize) -> Vec<ReportFrame> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 256];
    let mut frames = Vec::new();
    while frames.len() < expected {
        let n = stream.read(&mut chunk).expect("broker read");
        assert!(n > 0, "adapter hung up early");
        buf.extend_from_slice(&chunk[..n]);
        while let Ok((frame, consumed)) = decode_frame(&buf) {
            buf.drain(..consumed);
            frames.push(frame);
        }
    }
    frames
}

#[test]
fn test_keyboard_events_arrive_as_framed_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broker.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let mut sink = BrokerClient::new(&path);
    let mut pipeline = KeyboardPipeline::new();
    let mut source = ScriptedSource::new([
        InputEvent::Key {
            code: 42, // left shift
            pressed: true,
        },
        InputEvent::Key {
            code: 30, // A
            pressed: true,
        },
        InputEvent::Key {
            code: 30,
            pressed: false,
        },
    ]);

    pipeline.run(&mut source, &mut sink);

    let (mut broker_side, _) = listener.accept().unwrap();
    let frames = read_frames(&mut broker_side, 3);

    let ReportFrame::Keys(shifted_a) = frames[1] else {
        panic!("expected a keyboard frame");
    };
    assert_eq!(shifted_a, [0xA1, 0x01, 0x02, 0x00, 0x04, 0, 0, 0, 0, 0]);
}

#[test]
fn test_mouse_events_arrive_as_framed_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broker.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let mut sink = BrokerClient::new(&path);
    let mut pipeline = MousePipeline::new();
    let mut source = ScriptedSource::new([
        InputEvent::Button {
            code: 272, // left
            pressed: true,
        },
        InputEvent::Rel { axis: 0, value: -4 },
        InputEvent::Button {
            code: 272,
            pressed: false,
        },
    ]);

    pipeline.run(&mut source, &mut sink);

    let (mut broker_side, _) = listener.accept().unwrap();
    let frames = read_frames(&mut broker_side, 3);

    assert_eq!(
        frames,
        vec![
            ReportFrame::Mouse([0xA1, 0x02, 0x01, 0x00, 0x00, 0x00]),
            ReportFrame::Mouse([0xA1, 0x02, 0x01, 0xFC, 0x00, 0x00]),
            ReportFrame::Mouse([0xA1, 0x02, 0x00, 0x00, 0x00, 0x00]),
        ]
    );
}
