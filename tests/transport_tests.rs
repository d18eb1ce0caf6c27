use skirmish::transport::tcp::TcpTransport;
use skirmish::transport::in_memory::InMemoryTransport;
use skirmish::transport::Transport;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn test_in_memory_pair_delivers_in_order() -> anyhow::Result<()> {
    let (mut left, mut right) = InMemoryTransport::pair();
    left.send("one").await?;
    left.send("two").await?;
    right.send("back").await?;

    assert_eq!(right.recv().await?, "one");
    assert_eq!(right.recv().await?, "two");
    assert_eq!(left.recv().await?, "back");

    drop(left);
    assert!(right.recv().await.is_err());
    assert!(right.send("anyone?").await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_split_halves_close_the_peer() -> anyhow::Result<()> {
    let (left, mut right) = InMemoryTransport::pair();
    let (mut reader, mut writer) = Box::new(left).split();

    writer.send("hi").await?;
    assert_eq!(right.recv().await?, "hi");
    right.send("yo").await?;
    assert_eq!(reader.recv().await?, "yo");

    writer.close().await?;
    assert!(writer.send("late").await.is_err());
    assert!(right.recv().await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tcp_frames_are_length_prefixed() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut len = [0u8; 4];
        socket.read_exact(&mut len).await.unwrap();
        let mut body = vec![0u8; u32::from_be_bytes(len) as usize];
        socket.read_exact(&mut body).await.unwrap();
        assert_eq!(body, br#"{"character":"A-P1","move":"Backward"}"#);

        let reply = "ünïcode ok".as_bytes();
        socket.write_all(&(reply.len() as u32).to_be_bytes()).await.unwrap();
        socket.write_all(reply).await.unwrap();
    });

    let mut transport = TcpTransport::connect(addr).await?;
    transport.send(r#"{"character":"A-P1","move":"Backward"}"#).await?;
    assert_eq!(transport.recv().await?, "ünïcode ok");
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_length_prefix() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err().to_string();
    assert!(err.contains("too large"), "unexpected error: {}", err);

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_length_and_invalid_utf8_frames() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0u8, 0, 0, 0]).await.unwrap();
        socket.write_all(&[0u8, 0, 0, 2, 0xC3, 0x28]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err().to_string();
    assert!(err.contains("length: 0"), "unexpected error: {}", err);
    let err = transport.recv().await.unwrap_err().to_string();
    assert!(err.contains("UTF-8"), "unexpected error: {}", err);

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_peer_hangup_is_reported() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let mut transport = TcpTransport::connect(addr).await?;
    server_task.await?;
    assert!(transport.recv().await.is_err());
    Ok(())
}
