//! Streaming reader behaviour across chunk boundaries.

use gridifier::{ReadStats, VertexReader};
use tokio_test::io::Builder;

async fn collect<R>(reader: R, chunk: usize) -> (Vec<(f64, f64, f64)>, ReadStats)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut out = Vec::new();
    let stats = VertexReader::new(reader, chunk)
        .for_each_vertex(|x, y, z| out.push((x, y, z)))
        .await
        .unwrap();
    (out, stats)
}

// ============================================================================
// Chunk boundaries
// ============================================================================

#[tokio::test]
async fn test_record_split_across_reads() {
    let mock = Builder::new()
        .read(b"v 1.0 2")
        .read(b".5 3.0\nv 4 5")
        .read(b" 6\n")
        .build();

    let (vertices, stats) = collect(mock, 4).await;
    assert_eq!(vertices, vec![(1.0, 2.5, 3.0), (4.0, 5.0, 6.0)]);
    assert_eq!(stats.vertices, 2);
    assert_eq!(stats.skipped, 0);
}

#[tokio::test]
async fn test_unterminated_last_line_is_parsed() {
    let mock = Builder::new().read(b"v 0 0 1\nv 2 2 ").read(b"3").build();
    let (vertices, _) = collect(mock, 64).await;
    assert_eq!(vertices, vec![(0.0, 0.0, 1.0), (2.0, 2.0, 3.0)]);
}

#[tokio::test]
async fn test_crlf_line_endings() {
    let mock = Builder::new().read(b"v 1 2 3\r\nvn 0 0 1\r\nv 4 5 6\r\n").build();
    let (vertices, stats) = collect(mock, 8).await;
    assert_eq!(vertices.len(), 2);
    assert_eq!(stats.lines, 3);
}

#[tokio::test]
async fn test_every_split_point_gives_same_vertices() {
    let text: &[u8] = b"# tile\nv 10.25 -3 7\nf 1 2 3\nv 1e1 2 3\nv bad 2 3\nv 0 0 0";

    let (expected, expected_stats) = collect(std::io::Cursor::new(text.to_vec()), 1024).await;
    assert_eq!(expected.len(), 3);
    assert_eq!(expected_stats.skipped, 1);

    for split in 1..text.len() {
        let mock = Builder::new()
            .read(&text[..split])
            .read(&text[split..])
            .build();
        let (vertices, stats) = collect(mock, 3).await;
        assert_eq!(vertices, expected, "split at byte {split}");
        assert_eq!(stats.skipped, 1, "split at byte {split}");
    }
}

// ============================================================================
// Malformed input
// ============================================================================

#[tokio::test]
async fn test_malformed_records_counted_not_fatal() {
    let text = "v 1 2\nv a b c\nv 1 2 3\nv 1 2 nan\n";
    let (vertices, stats) = collect(std::io::Cursor::new(text.as_bytes().to_vec()), 16).await;
    assert_eq!(vertices, vec![(1.0, 2.0, 3.0)]);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.bytes, text.len() as u64);
}

#[tokio::test]
async fn test_empty_input() {
    let (vertices, stats) = collect(std::io::Cursor::new(Vec::new()), 16).await;
    assert!(vertices.is_empty());
    assert_eq!(stats, ReadStats::default());
}
