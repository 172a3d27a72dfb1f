//! Integration tests for the pwgen-core public API.
//!
//! These drive the codec, transport, validation, and generators together the
//! way a server and client pair would over a single connection.

use pwgen_core::protocol::messages::{
    MENU_WIRE_SIZE, REQUEST_WIRE_SIZE, RESPONSE_WIRE_SIZE,
};
use pwgen_core::{
    decode_message, encode_message, read_message, validate_request, write_message, LengthBounds,
    MenuMessage, PasswordClass, PasswordGenerator, PasswordRequest, PasswordResponse,
    RandomPasswordGenerator, TransportError, ValidationError,
};

/// Answers one request the way the server does, without any session state.
fn answer(request: &PasswordRequest) -> PasswordResponse {
    if request.is_quit() {
        return PasswordResponse::Terminate;
    }
    match validate_request(request.selector, &request.length_text, LengthBounds::default()) {
        Ok((class, length)) => {
            PasswordResponse::success(RandomPasswordGenerator.generate(class, length))
        }
        Err(e) => PasswordResponse::error(e.wire_message()),
    }
}

#[test]
fn test_encoded_sizes_are_fixed_regardless_of_content() {
    let short = encode_message(&PasswordRequest::new('n', "")).unwrap();
    let long = encode_message(&PasswordRequest::new('n', "9".repeat(1023))).unwrap();
    assert_eq!(short.len(), REQUEST_WIRE_SIZE);
    assert_eq!(long.len(), REQUEST_WIRE_SIZE);

    assert_eq!(encode_message(&MenuMessage::new("")).unwrap().len(), MENU_WIRE_SIZE);
    assert_eq!(
        encode_message(&PasswordResponse::Terminate).unwrap().len(),
        RESPONSE_WIRE_SIZE
    );
}

#[test]
fn test_request_bytes_decode_to_server_answer() {
    let bytes = encode_message(&PasswordRequest::new('a', "12")).unwrap();
    let request: PasswordRequest = decode_message(&bytes).unwrap();

    let response = answer(&request);

    let password = response.password();
    assert_eq!(password.len(), 12);
    assert!(password.chars().all(|c| PasswordClass::Alpha.contains(c)));
}

#[test]
fn test_invalid_requests_produce_wire_error_text() {
    let cases = [
        (PasswordRequest::new('x', "8"), ValidationError::InvalidType),
        (PasswordRequest::new('s', "abc"), ValidationError::InvalidLength),
        (PasswordRequest::new('n', "5"), ValidationError::InvalidLength),
        (PasswordRequest::new('n', ""), ValidationError::InvalidLength),
    ];

    for (request, expected) in cases {
        let response = answer(&request);
        let bytes = encode_message(&response).unwrap();
        let decoded: PasswordResponse = decode_message(&bytes).unwrap();
        assert_eq!(decoded, PasswordResponse::error(expected.wire_message()), "{request:?}");
        assert!(decoded.keep_going());
    }
}

#[tokio::test]
async fn test_full_exchange_over_duplex_stream() {
    let (mut client, mut server) = tokio::io::duplex(8192);

    let server_task = tokio::spawn(async move {
        write_message(&mut server, &MenuMessage::default()).await?;
        loop {
            let request: PasswordRequest = read_message(&mut server).await?;
            let response = answer(&request);
            write_message(&mut server, &response).await?;
            if !response.keep_going() {
                return Ok::<_, TransportError>(());
            }
        }
    });

    let menu: MenuMessage = read_message(&mut client).await.expect("menu");
    assert!(menu.menu_text.contains("between 6 and 32"));

    write_message(&mut client, &PasswordRequest::new('N', "8")).await.unwrap();
    let first: PasswordResponse = read_message(&mut client).await.unwrap();
    assert_eq!(first.password().len(), 8);
    assert!(first.password().chars().all(|c| c.is_ascii_digit()));

    write_message(&mut client, &PasswordRequest::quit()).await.unwrap();
    let last: PasswordResponse = read_message(&mut client).await.unwrap();
    assert_eq!(last, PasswordResponse::Terminate);

    server_task.await.expect("join").expect("server side");
}

#[tokio::test]
async fn test_peer_close_between_messages_is_clean() {
    let (client, mut server) = tokio::io::duplex(1024);
    drop(client);

    let err = read_message::<PasswordRequest, _>(&mut server)
        .await
        .expect_err("closed stream must not yield a request");
    assert!(err.is_clean_close());
}
