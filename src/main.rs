use axum::{
    routing::{get, post},
    Extension, Router,
};
use para_word_count::analysis::aggregator;
use para_word_count::dispatch::handlers::handle_submit_paragraphs;
use para_word_count::jobs::handlers::handle_get_job_status;
use para_word_count::jobs::queue::JobQueue;
use para_word_count::jobs::registry::JobHandlerRegistry;
use para_word_count::jobs::sink::JobSink;
use para_word_count::jobs::types::RetryPolicy;
use para_word_count::jobs::worker::WorkerPool;
use para_word_count::maintenance;
use para_word_count::search::handlers::handle_search;
use para_word_count::store;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "127.0.0.1:8080".parse()?;
    let mut db_path = PathBuf::from("para_word_count.db");
    let mut worker_count = 4usize;
    let mut retention_days = 30i64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--db" => {
                db_path = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--workers" => {
                worker_count = args[i + 1].parse()?;
                i += 2;
            }
            "--retention-days" => {
                retention_days = args[i + 1].parse()?;
                i += 2;
            }
            "--help" => {
                eprintln!(
                    "Usage: {} [--bind <addr:port>] [--db <path>] [--workers <n>] [--retention-days <n>]",
                    args[0]
                );
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Starting para-word-count on {}", bind_addr);

    // 1. Durable store:
    let pool = store::schema::connect(&db_path).await?;
    store::schema::init_schema(&pool).await?;
    tracing::info!("Database ready at {}", db_path.display());

    // 2. Job broker:
    let queue = Arc::new(JobQueue::new(RetryPolicy::default()));
    let registry = JobHandlerRegistry::new();

    aggregator::register_jobs(&registry, pool.clone());

    let workers = WorkerPool::new(queue.clone(), registry, worker_count);
    workers.start();

    // 3. HTTP router:
    let sink: Arc<dyn JobSink> = queue.clone();
    let app = Router::new()
        .route("/paragraphs", post(handle_submit_paragraphs))
        .route("/search", get(handle_search))
        .route("/jobs/:id", get(handle_get_job_status))
        .route("/stats", get(maintenance::handle_stats))
        .layer(Extension(pool.clone()))
        .layer(Extension(queue.clone()))
        .layer(Extension(sink));

    // 4. Scheduled maintenance:
    maintenance::spawn_schedules(pool, queue.clone(), retention_days);

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
