use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use mc_rcon::core::codec::PacketCodec;
use mc_rcon::core::packet::{Packet, TYPE_EXEC_COMMAND};
use tokio_util::codec::{Decoder, Encoder};

#[allow(clippy::unwrap_used)]
fn bench_packet_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_encode_decode");
    // RCON payloads are command lines and chat-sized replies.
    let payload_sizes = [16usize, 128, 1024, 4096];

    for &size in &payload_sizes {
        let payload = "x".repeat(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                || payload.clone(),
                |payload| {
                    let packet = Packet {
                        id: 1,
                        ptype: TYPE_EXEC_COMMAND,
                        payload,
                    };
                    let mut buf = BytesMut::with_capacity(size + 32);
                    let mut codec = PacketCodec;
                    codec.encode(packet, &mut buf).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("decode_{size}b"), |b| {
            let mut frame = BytesMut::new();
            let mut codec = PacketCodec;
            codec
                .encode(
                    Packet {
                        id: 1,
                        ptype: TYPE_EXEC_COMMAND,
                        payload: payload.clone(),
                    },
                    &mut frame,
                )
                .unwrap();
            let frame = frame.freeze();

            b.iter_batched(
                || BytesMut::from(&frame[..]),
                |mut buf| {
                    let mut codec = PacketCodec;
                    codec.decode(&mut buf).unwrap().unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_packet_encode_decode);
criterion_main!(benches);
