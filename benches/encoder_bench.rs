use criterion::{black_box, criterion_group, criterion_main, Criterion};

use osc_proto::encoder;
use osc_proto::{OscBundle, OscColor, OscMessage, OscMidiMessage, OscPacket, OscType};

fn bench_encode_args_blob(c: &mut Criterion) {
    // 1000 arguments, each a blob of 0-19 bytes.
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Blobs".into(),
        args: (0..1000)
            .map(|x| OscType::Blob((0..=(x % 19) as u8).collect()))
            .collect(),
    });

    c.bench_function("encode 1000 blob args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_args_bool(c: &mut Criterion) {
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Bools".into(),
        args: (0..1000).map(|x| OscType::Bool((x % 2) == 1)).collect(),
    });

    c.bench_function("encode 1000 bool args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_args_double(c: &mut Criterion) {
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Doubles".into(),
        args: (0..1000).map(|x| OscType::Double(x as f64)).collect(),
    });

    c.bench_function("encode 1000 double args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_args_float(c: &mut Criterion) {
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Floats".into(),
        args: (0..1000).map(|x| OscType::Float(x as f32)).collect(),
    });

    c.bench_function("encode 1000 float args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_args_int(c: &mut Criterion) {
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Ints".into(),
        args: (0..1000).map(OscType::Int).collect(),
    });

    c.bench_function("encode 1000 int args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_args_long(c: &mut Criterion) {
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Longs".into(),
        args: (0..1000).map(OscType::Long).collect(),
    });

    c.bench_function("encode 1000 long args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_args_string(c: &mut Criterion) {
    let packet = OscPacket::Message(OscMessage {
        addr: "/OSC/Strings".into(),
        args: (0..1000).map(|x| OscType::String(x.to_string())).collect(),
    });

    c.bench_function("encode 1000 string args", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_bundles(c: &mut Criterion) {
    // 1000 empty sub-bundles.
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Bundle(OscBundle {
                timetag: (0, 0).into(),
                content: vec![],
            });
            1000
        ],
    });

    c.bench_function("encode 1000 empty sub-bundles", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });

    c.bench_function("encode 1000 empty sub-bundles into reused vec", |b| {
        let mut buffer = Vec::new();
        b.iter(|| {
            buffer.clear();
            encoder::encode_into(black_box(&packet), &mut buffer).unwrap()
        });
    });
}

fn bench_encode_huge_bundle(c: &mut Criterion) {
    // 1000 messages, each carrying one argument of every supported type
    // (including a 1 KB blob).
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![
            OscPacket::Message(OscMessage {
                addr: "/OSC/Message".into(),
                args: vec![
                    4i32.into(),
                    42i64.into(),
                    3.1415926f32.into(),
                    3.14159265359f64.into(),
                    "String".into(),
                    (0..1024).map(|x| x as u8).collect::<Vec<u8>>().into(),
                    (123, 456).into(),
                    'c'.into(),
                    false.into(),
                    true.into(),
                    OscType::Nil,
                    OscType::Inf,
                    OscMidiMessage {
                        port: 4,
                        status: 41,
                        data1: 42,
                        data2: 129,
                    }
                    .into(),
                    OscColor {
                        red: 255,
                        green: 192,
                        blue: 42,
                        alpha: 13,
                    }
                    .into(),
                ],
            });
            1000
        ],
    });

    c.bench_function("encode huge bundle of 1000 messages", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });

    c.bench_function("encode huge bundle into reused vec", |b| {
        let mut buffer = Vec::new();
        b.iter(|| {
            buffer.clear();
            encoder::encode_into(black_box(&packet), &mut buffer).unwrap()
        });
    });
}

fn bench_encode_messages(c: &mut Criterion) {
    let packet = OscPacket::Bundle(OscBundle {
        timetag: (0, 0).into(),
        content: vec![OscPacket::Message(OscMessage::new("/OSC/Message")); 1000],
    });

    c.bench_function("encode 1000 argument-less messages", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

fn bench_encode_nested_bundles(c: &mut Criterion) {
    let mut packet = OscPacket::Message(OscMessage::new("/OSC/Nested"));
    for _ in 0..20 {
        packet = OscPacket::Bundle(OscBundle {
            timetag: (0, 0).into(),
            content: vec![packet],
        });
    }

    c.bench_function("encode 20-deep nested bundle", |b| {
        b.iter(|| encoder::encode(black_box(&packet)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_encode_args_blob,
    bench_encode_args_bool,
    bench_encode_args_double,
    bench_encode_args_float,
    bench_encode_args_int,
    bench_encode_args_long,
    bench_encode_args_string,
    bench_encode_bundles,
    bench_encode_huge_bundle,
    bench_encode_messages,
    bench_encode_nested_bundles,
);
criterion_main!(benches);
