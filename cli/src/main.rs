//! Whiteboard CLI: draws through the board engine and talks to the store
//! server over its websocket protocol.

mod script;

use std::path::PathBuf;
use std::time::Duration;

use board::element::{DrawingElement, ElementMap};
use board::engine::{Action, BoardEngine};
use board::render;
use board::surface::Surface;
use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use wire::{Event, Request};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("frame decode failed: {0}")]
    Decode(#[from] wire::CodecError),
    #[error("timed out waiting for websocket frame")]
    Timeout,
    #[error("server rejected request: {0}")]
    Server(String),
    #[error(transparent)]
    Parse(#[from] script::ParseError),
    #[error("surface error: {0}")]
    Surface(#[from] board::surface::SurfaceError),
    #[error("text must not be empty")]
    EmptyText,
    #[error("stroke produced no element")]
    EmptyStroke,
}

#[derive(Parser, Debug)]
#[command(name = "whiteboard", about = "Shared whiteboard client")]
struct Cli {
    /// Base URL of the store server.
    #[arg(long, env = "INKBOARD_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the store server is reachable.
    Ping,
    /// Draw one stroke from a pointer script and publish it.
    Draw {
        /// Pointer script: whitespace-separated `x,y` pairs, first pair is
        /// pointer-down, the rest are pointer-moves.
        points: String,
        /// Drawing tool: pencil, line, square, circle, or eraser.
        #[arg(long, default_value = "pencil")]
        tool: String,
        /// Stroke color as a hex string.
        #[arg(long, default_value = "#000000")]
        color: String,
        /// Stroke width in pixels.
        #[arg(long, default_value_t = 2.0)]
        width: f64,
    },
    /// Place a text element and publish it.
    Text {
        /// The text content.
        content: String,
        /// Anchor position as a single `x,y` pair.
        #[arg(long, default_value = "50,50")]
        at: String,
        /// Text color as a hex string.
        #[arg(long, default_value = "#000000")]
        color: String,
        /// Font scale; font pixel size is ten times this value.
        #[arg(long, default_value_t = 2.0)]
        width: f64,
    },
    /// Remove every element from the shared board.
    Clear,
    /// Render the current board to a PNG file.
    Export(RenderArgs),
    /// Re-render the board to the same PNG file on every change.
    Watch(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Output PNG path.
    #[arg(long, default_value = "whiteboard.png")]
    output: PathBuf,
    /// Surface size as `WIDTHxHEIGHT`.
    #[arg(long, default_value = "800x600")]
    size: String,
    /// Background theme: light or dark.
    #[arg(long, default_value = "light")]
    theme: String,
    /// Image file composited onto the render at the origin. Local-only: the
    /// overlay is not an element and is gone from the next re-render.
    #[arg(long)]
    import: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Ping => run_ping(&cli.url).await,
        Command::Draw { points, tool, color, width } => {
            run_draw(&cli.url, &points, &tool, color, width).await
        }
        Command::Text { content, at, color, width } => {
            run_text(&cli.url, &content, &at, color, width).await
        }
        Command::Clear => run_clear(&cli.url).await,
        Command::Export(args) => run_export(&cli.url, &args).await,
        Command::Watch(args) => run_watch(&cli.url, &args).await,
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_draw(
    base_url: &str,
    points: &str,
    tool: &str,
    color: String,
    width: f64,
) -> Result<(), CliError> {
    let points = script::parse_points(points)?;
    let tool = script::parse_tool(tool)?;

    let mut engine = BoardEngine::new();
    engine.set_tool(tool);
    engine.set_color(color);
    engine.set_width(width);

    let mut iter = points.into_iter();
    if let Some(first) = iter.next() {
        engine.pointer_down(first);
    }
    for point in iter {
        engine.pointer_move(point);
    }
    let Action::Committed(element) = engine.pointer_up() else {
        // Not reachable with a non-empty script; the parser rejects empty ones.
        return Err(CliError::EmptyStroke);
    };

    publish(base_url, element).await
}

async fn run_text(
    base_url: &str,
    content: &str,
    at: &str,
    color: String,
    width: f64,
) -> Result<(), CliError> {
    let anchors = script::parse_points(at)?;
    let anchor = *anchors.first().ok_or(CliError::EmptyStroke)?;

    let mut engine = BoardEngine::new();
    engine.set_color(color);
    engine.set_width(width);
    let Action::Committed(element) = engine.commit_text(anchor, content) else {
        return Err(CliError::EmptyText);
    };

    publish(base_url, element).await
}

async fn run_clear(base_url: &str) -> Result<(), CliError> {
    let mut subscription = Subscription::open(base_url).await?;
    subscription.send(&Request::Clear).await?;

    // The echo confirms the clear reached the store.
    loop {
        let elements = subscription.next_snapshot(Some(ACK_TIMEOUT)).await?;
        if elements.is_empty() {
            break;
        }
    }
    subscription.close().await;
    println!("board cleared");
    Ok(())
}

async fn run_export(base_url: &str, args: &RenderArgs) -> Result<(), CliError> {
    let (width, height) = script::parse_size(&args.size)?;
    let theme = script::parse_theme(&args.theme)?;

    let mut subscription = Subscription::open(base_url).await?;
    let elements = subscription.next_snapshot(Some(ACK_TIMEOUT)).await?;
    subscription.close().await;

    let mut surface = Surface::new(width, height);
    let count = paint(&mut surface, elements, theme, args.import.as_deref())?;
    surface.save_png(&args.output)?;
    println!("exported {count} elements to {}", args.output.display());
    Ok(())
}

async fn run_watch(base_url: &str, args: &RenderArgs) -> Result<(), CliError> {
    let (width, height) = script::parse_size(&args.size)?;
    let theme = script::parse_theme(&args.theme)?;

    let mut subscription = Subscription::open(base_url).await?;
    let mut surface = Surface::new(width, height);
    // The imported overlay is painted once; the next snapshot repaints the
    // world without it.
    let mut import = args.import.clone();

    loop {
        let elements = subscription.next_snapshot(None).await?;
        let count = paint(&mut surface, elements, theme, import.take().as_deref())?;
        surface.save_png(&args.output)?;
        eprintln!("rendered {count} elements to {}", args.output.display());
    }
}

/// Render a snapshot onto the surface, compositing an optional import file.
/// Returns the element count.
fn paint(
    surface: &mut Surface,
    elements: Vec<DrawingElement>,
    theme: board::surface::Theme,
    import: Option<&std::path::Path>,
) -> Result<usize, CliError> {
    let mut map = ElementMap::new();
    map.replace_all(elements);
    render::draw(surface, &map, theme);
    if let Some(path) = import {
        let overlay = board::surface::load_image(path)?;
        surface.composite(&overlay, 0, 0);
    }
    Ok(map.len())
}

// =============================================================================
// STORE CONNECTION
// =============================================================================

const ACK_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// An owned subscription to the shared store: a live websocket that has sent
/// `subscribe` and receives a full snapshot on every change.
struct Subscription {
    stream: WsStream,
}

impl Subscription {
    /// Connect to the store and subscribe.
    async fn open(base_url: &str) -> Result<Self, CliError> {
        let url = ws_url(base_url)?;
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| CliError::WsConnect(Box::new(error)))?;
        let mut subscription = Self { stream };
        subscription.send(&Request::Subscribe).await?;
        Ok(subscription)
    }

    /// Send one request frame.
    async fn send(&mut self, request: &Request) -> Result<(), CliError> {
        let text = wire::encode_request(request);
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|error| CliError::WsConnect(Box::new(error)))
    }

    /// Wait for the next snapshot event, skipping anything else. An `error`
    /// event from the server fails the wait. With no timeout this blocks
    /// until the store changes.
    async fn next_snapshot(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Vec<DrawingElement>, CliError> {
        let fut = async {
            loop {
                let Some(message) = self.stream.next().await else {
                    return Err(CliError::WsClosed);
                };
                let message = message.map_err(|error| CliError::WsConnect(Box::new(error)))?;
                match message {
                    Message::Text(text) => match wire::decode_event(text.as_str())? {
                        Event::Snapshot { elements } => return Ok(elements),
                        Event::Error { message } => return Err(CliError::Server(message)),
                    },
                    Message::Close(_) => return Err(CliError::WsClosed),
                    _ => {}
                }
            }
        };
        match timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| CliError::Timeout)?,
            None => fut.await,
        }
    }

    /// Close the websocket. Errors on close are ignored; the subscription is
    /// spent either way.
    async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Publish one element and wait for the echo snapshot to contain it.
async fn publish(base_url: &str, element: DrawingElement) -> Result<(), CliError> {
    let element_id = element.id;
    let mut subscription = Subscription::open(base_url).await?;
    subscription.send(&Request::Put { element }).await?;

    loop {
        let elements = subscription.next_snapshot(Some(ACK_TIMEOUT)).await?;
        if elements.iter().any(|e| e.id == element_id) {
            break;
        }
    }
    subscription.close().await;
    println!("published {element_id}");
    Ok(())
}

fn ws_url(base_url: &str) -> Result<String, CliError> {
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{}/api/ws", rest.trim_end_matches('/')));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{}/api/ws", rest.trim_end_matches('/')));
    }
    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;
