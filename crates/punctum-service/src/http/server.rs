use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tiny_http::{Request, Response, Server};

const HTTP_WORKER_FACTOR: usize = 4;
const HTTP_WORKER_MIN: usize = 8;
const HTTP_QUEUE_FACTOR: usize = 4;
const HTTP_QUEUE_MIN: usize = 32;

fn http_worker_count() -> usize {
    // 中文注释：一次编排可能串行等待多个上游重试；固定 worker 上限，避免并发时无限 spawn 拖垮进程。
    let cpus = thread::available_parallelism().map(|v| v.get()).unwrap_or(4);
    (cpus * HTTP_WORKER_FACTOR).max(HTTP_WORKER_MIN)
}

fn http_queue_size(worker_count: usize) -> usize {
    // 中文注释：使用有界队列给入口施加背压；不这样做会在峰值流量下无限堆积请求并放大内存抖动。
    worker_count
        .saturating_mul(HTTP_QUEUE_FACTOR)
        .max(HTTP_QUEUE_MIN)
}

fn spawn_request_workers(worker_count: usize, rx: mpsc::Receiver<Request>) {
    let shared_rx = Arc::new(Mutex::new(rx));
    for _ in 0..worker_count {
        let worker_rx = Arc::clone(&shared_rx);
        let _ = thread::spawn(move || loop {
            let request = {
                let Ok(guard) = worker_rx.lock() else {
                    break;
                };
                match guard.recv() {
                    Ok(request) => request,
                    Err(_) => break,
                }
            };
            route_request(request);
        });
    }
}

pub fn start_http(addr: &str) -> io::Result<()> {
    let server =
        Server::http(addr).map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    let worker_count = http_worker_count();
    let queue_size = http_queue_size(worker_count);
    let (tx, rx) = mpsc::sync_channel::<Request>(queue_size);
    spawn_request_workers(worker_count, rx);

    for request in server.incoming_requests() {
        if crate::shutdown_requested() || request.url() == "/__shutdown" {
            let _ = request.respond(Response::from_string("shutdown"));
            break;
        }
        if tx.send(request).is_err() {
            break;
        }
    }
    Ok(())
}

pub fn route_request(request: Request) {
    if request.method().as_str() == "OPTIONS" {
        let _ = request.respond(Response::empty(204));
        return;
    }
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    if request.method().as_str() == "GET" && path == "/health" {
        let _ = request.respond(Response::from_string("ok"));
        return;
    }
    if request.method().as_str() == "POST" {
        match path.as_str() {
            "/api/extract-emotions" => {
                crate::orchestrator::handle_extract_emotions(request);
                return;
            }
            "/api/analyze-vision" => {
                crate::orchestrator::handle_analyze_vision(request);
                return;
            }
            "/api/analyze-consensus" => {
                crate::orchestrator::handle_analyze_consensus(request);
                return;
            }
            _ => {}
        }
    }
    let _ = request.respond(Response::from_string("not found").with_status_code(404));
}
