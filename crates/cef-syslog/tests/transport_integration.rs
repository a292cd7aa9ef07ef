//! 실제 소켓을 사용한 syslog 전송 통합 테스트

use chrono::{TimeZone, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, UdpSocket};

use logsync_cef_syslog::{
    CefRecord, CefSyslogError, Facility, Network, Priority, Severity, SyslogWriter, WriterOptions,
};

fn options(network: Network, addr: String) -> WriterOptions {
    WriterOptions::new(network, addr, Priority::new(Facility::Auth, Severity::Info))
        .with_tag("logsync")
        .with_hostname("lms-host")
}

#[tokio::test]
async fn tcp_writer_delivers_newline_framed_records() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut received = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            received.push(line);
            if received.len() == 2 {
                break;
            }
        }
        received
    });

    let writer = SyslogWriter::connect(options(Network::Tcp, addr))
        .await
        .unwrap();
    let stamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let record = CefRecord::new("100", "Login", 5)
        .with_extension("suser", "alice")
        .to_string();

    writer.write_at(stamp, Severity::Notice, &record).await.unwrap();
    writer.write_at(stamp, Severity::Err, "second").await.unwrap();
    writer.close().await.unwrap();

    let received = server.await.unwrap();
    let pid = std::process::id();
    assert_eq!(
        received[0],
        format!(
            "<37>2023-11-14T22:13:20Z lms-host logsync[{pid}]: CEF:0|Swiss Learning Hub AG|LMS|1.0.0|100|Login|5|suser=alice"
        )
    );
    assert!(received[1].starts_with("<35>"));
    assert!(received[1].ends_with(": second"));
}

#[tokio::test]
async fn udp_writer_sends_one_datagram_per_record() {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = receiver.local_addr().unwrap().to_string();

    let writer = SyslogWriter::connect(options(Network::Udp, addr))
        .await
        .unwrap();
    writer.write(Severity::Info, "first").await.unwrap();
    writer.write(Severity::Info, "second\n").await.unwrap();

    let mut buf = [0u8; 512];
    let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
    let first = String::from_utf8_lossy(&buf[..n]).into_owned();
    let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
    let second = String::from_utf8_lossy(&buf[..n]).into_owned();

    assert!(first.starts_with("<38>"));
    assert!(first.ends_with(": first\n"));
    assert!(second.ends_with(": second\n"));
}

#[tokio::test]
async fn connect_to_closed_port_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = SyslogWriter::connect(options(Network::Tcp, addr)).await;
    assert!(matches!(result, Err(CefSyslogError::Dial { .. })));
}

#[tokio::test]
async fn writer_redials_after_collector_restart() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = SyslogWriter::connect(options(Network::Tcp, addr.to_string()))
        .await
        .unwrap();
    let (first_conn, _) = listener.accept().await.unwrap();

    // 명시적으로 닫은 뒤 쓰면 새 연결을 엶
    writer.close().await.unwrap();
    drop(first_conn);
    assert!(!writer.is_connected().await);

    let accept = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        lines.next_line().await.unwrap()
    });

    writer.write(Severity::Info, "after restart").await.unwrap();
    let line = accept.await.unwrap().unwrap();
    assert!(line.ends_with(": after restart"));
}
