//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use tokumei_server::infrastructure::dto::websocket::{ChatPayloadDto, ClientEvent, ServerEvent};
use tokumei_shared::time::now_unix_millis;

use super::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// How the read loop ended
enum ReadOutcome {
    /// Server closed the connection or the stream errored
    ConnectionLost,
    /// The server rejected our registration
    RegistrationRejected(String),
}

/// Run the WebSocket client session
pub async fn run_client_session(
    url: &str,
    username: &str,
    gender: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| Box::new(ClientError::ConnectionError(e.to_string())))?;

    tracing::info!("Connected to matchmaking server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. /next for a new partner, /quit to leave.\n",
        username
    );

    let (mut write, mut read) = ws_stream.split();

    // Register before anything else; the server matches us as soon as
    // a partner is available
    let register = ClientEvent::Register {
        username: username.to_string(),
        gender: gender.map(str::to_string),
    };
    write
        .send(Message::Text(serde_json::to_string(&register)?.into()))
        .await
        .map_err(|e| Box::new(ClientError::ConnectionError(e.to_string())))?;

    // Clone username for read task
    let username_for_read = username.to_string();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut outcome = None;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::RegistrationError { reason }) => {
                            outcome = Some(ReadOutcome::RegistrationRejected(reason));
                            break;
                        }
                        Ok(ServerEvent::Waiting) => {
                            print!("{}", MessageFormatter::format_waiting());
                            redisplay_prompt(&username_for_read);
                        }
                        Ok(ServerEvent::ChatStart { partner_name }) => {
                            print!("{}", MessageFormatter::format_chat_start(&partner_name));
                            redisplay_prompt(&username_for_read);
                        }
                        Ok(ServerEvent::ChatMessage {
                            sender, message, ..
                        }) => {
                            print!(
                                "{}",
                                MessageFormatter::format_chat_message(&sender, &message)
                            );
                            redisplay_prompt(&username_for_read);
                        }
                        Ok(ServerEvent::PartnerTyping { is_typing }) => {
                            let formatted = MessageFormatter::format_partner_typing(is_typing);
                            if !formatted.is_empty() {
                                print!("{}", formatted);
                                redisplay_prompt(&username_for_read);
                            }
                        }
                        Ok(ServerEvent::PartnerLeft) => {
                            print!("{}", MessageFormatter::format_partner_left());
                            redisplay_prompt(&username_for_read);
                        }
                        Ok(ServerEvent::Inactive) => {
                            print!("{}", MessageFormatter::format_inactive());
                            // The server closes the endpoint next; treat as a
                            // normal end of session
                            break;
                        }
                        Ok(ServerEvent::Error { reason }) => {
                            print!("{}", MessageFormatter::format_error(&reason));
                            redisplay_prompt(&username_for_read);
                        }
                        // If parsing fails, display as raw text
                        Err(_) => {
                            print!("{}", MessageFormatter::format_raw_message(&text));
                            redisplay_prompt(&username_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    outcome = Some(ReadOutcome::ConnectionLost);
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    outcome = Some(ReadOutcome::ConnectionLost);
                    break;
                }
                _ => {}
            }
        }

        outcome
    });

    // Clone username for the input loop
    let username = username.to_string();
    let username_for_prompt = username.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send to WebSocket
    let username_for_write = username.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            if line == "/quit" {
                let _ = write.send(Message::Close(None)).await;
                break;
            }

            let event = if line == "/next" {
                ClientEvent::NextPartner
            } else {
                ClientEvent::ChatMessage {
                    message: ChatPayloadDto::Text {
                        body: line,
                        reply_to: None,
                    },
                }
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }

            if matches!(event, ClientEvent::ChatMessage { .. }) {
                // Display sent timestamp and redisplay prompt
                let formatted = MessageFormatter::format_sent_confirmation(now_unix_millis());
                print!("\n{}", formatted);
                redisplay_prompt(&username_for_write);
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            match read_result.unwrap_or(None) {
                Some(ReadOutcome::RegistrationRejected(reason)) => {
                    return Err(Box::new(ClientError::RegistrationRejected(reason)));
                }
                Some(ReadOutcome::ConnectionLost) => {
                    return Err(Box::new(ClientError::ConnectionError(
                        "Connection lost".to_string(),
                    )));
                }
                None => {}
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
