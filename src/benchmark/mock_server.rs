//! In-process RESP server for tests
//!
//! Speaks just enough of the protocol for the benchmark: AUTH, PING,
//! RPUSH and LPOP. QUIT hangs up without a reply. Every accepted
//! connection gets its own thread.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{BufReader, BufWriter, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::{BenchmarkConfig, ServerAddress, DEFAULT_IDLE_TIMEOUT};
use crate::utils::{RespDecoder, RespValue};

#[derive(Default)]
struct MockState {
    password: Option<String>,
    lists: Mutex<HashMap<String, VecDeque<Vec<u8>>>>,
    pushes: Mutex<Vec<(String, usize)>>,
    failing_keys: Mutex<HashSet<String>>,
    connections: AtomicUsize,
}

pub struct MockServer {
    address: ServerAddress,
    state: Arc<MockState>,
}

impl MockServer {
    /// Bind to an ephemeral loopback port and start accepting
    pub fn start(password: Option<&str>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("local addr").port();
        let state = Arc::new(MockState {
            password: password.map(str::to_string),
            ..MockState::default()
        });

        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                accept_state.connections.fetch_add(1, Ordering::SeqCst);
                let state = Arc::clone(&accept_state);
                thread::spawn(move || serve(stream, &state));
            }
        });

        Self {
            address: ServerAddress {
                host: "127.0.0.1".to_string(),
                port,
            },
            state,
        }
    }

    pub fn address(&self) -> ServerAddress {
        self.address.clone()
    }

    /// RPUSH on this key answers with an error reply
    pub fn fail_pushes_on(&self, key: &str) {
        self.state.failing_keys.lock().insert(key.to_string());
    }

    /// Every RPUSH received, as (key, value length)
    pub fn pushes(&self) -> Vec<(String, usize)> {
        self.state.pushes.lock().clone()
    }

    pub fn list_len(&self, key: &str) -> usize {
        self.state.lists.lock().get(key).map_or(0, VecDeque::len)
    }

    /// Connections accepted so far
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }
}

/// Benchmark configuration pointed at a mock server
pub fn test_config(
    server: &MockServer,
    threads: u32,
    num_elems: u64,
    packet_size: usize,
    run_count: u32,
) -> BenchmarkConfig {
    BenchmarkConfig {
        address: server.address(),
        password: None,
        connect_timeout: Duration::from_secs(5),
        request_timeout: Some(Duration::from_secs(5)),
        idle_timeout: DEFAULT_IDLE_TIMEOUT,
        threads,
        num_elems,
        packet_size,
        interval: Duration::from_secs(1),
        run_count,
        quiet: true,
        verbose: false,
    }
}

fn serve(stream: TcpStream, state: &MockState) {
    let Ok(write_half) = stream.try_clone() else {
        return;
    };
    let mut writer = BufWriter::new(write_half);
    let mut decoder = RespDecoder::new(BufReader::new(stream));
    let mut authed = state.password.is_none();

    while let Ok(request) = decoder.decode() {
        let args: Vec<Vec<u8>> = match request {
            RespValue::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_bytes().map(<[u8]>::to_vec))
                .collect(),
            _ => return,
        };
        let Some(name) = args.first() else { return };
        let name = String::from_utf8_lossy(name).to_uppercase();
        let arg = |i: usize| String::from_utf8_lossy(&args[i]).into_owned();

        let reply = match name.as_str() {
            "AUTH" if args.len() == 2 => {
                if state.password.as_deref() == Some(arg(1).as_str()) {
                    authed = true;
                    simple("OK")
                } else {
                    error("WRONGPASS invalid username-password pair")
                }
            }
            "QUIT" => return,
            _ if !authed => error("NOAUTH Authentication required."),
            "PING" => simple("PONG"),
            "RPUSH" if args.len() >= 3 => {
                let key = arg(1);
                if state.failing_keys.lock().contains(&key) {
                    error("ERR injected failure")
                } else {
                    let mut lists = state.lists.lock();
                    let list = lists.entry(key.clone()).or_default();
                    let mut pushes = state.pushes.lock();
                    for value in &args[2..] {
                        pushes.push((key.clone(), value.len()));
                        list.push_back(value.clone());
                    }
                    integer(list.len())
                }
            }
            "LPOP" if args.len() == 2 => {
                let mut lists = state.lists.lock();
                match lists.get_mut(&arg(1)).and_then(VecDeque::pop_front) {
                    Some(value) => bulk(&value),
                    None => b"$-1\r\n".to_vec(),
                }
            }
            _ => error("ERR unknown command"),
        };

        if writer.write_all(&reply).and_then(|_| writer.flush()).is_err() {
            return;
        }
    }
}

fn simple(s: &str) -> Vec<u8> {
    format!("+{}\r\n", s).into_bytes()
}

fn error(s: &str) -> Vec<u8> {
    format!("-{}\r\n", s).into_bytes()
}

fn integer(n: usize) -> Vec<u8> {
    format!(":{}\r\n", n).into_bytes()
}

fn bulk(data: &[u8]) -> Vec<u8> {
    let mut out = format!("${}\r\n", data.len()).into_bytes();
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
    out
}
