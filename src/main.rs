use astra::{ConnectionInfo, Request, Server};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Instant;
use tasador::cadastral::CadastralClient;
use tasador::config::Config;
use tasador::db::{init_db, Database};
use tasador::logging::init_logging;
use tasador::mailer::BrevoMailer;
use tasador::responses::error_to_response;
use tasador::router::{handle, AppState};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_logging(&config.log_level, &config.log_format);
    for warning in &config.warnings {
        warn!("{warning}");
    }

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        error!(error = %e, "database initialization failed");
        return ExitCode::FAILURE;
    }

    let registry = match CadastralClient::new(&config.catastro) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "cadastral client setup failed");
            return ExitCode::FAILURE;
        }
    };

    let mailer = match config.mail.as_ref().map(BrevoMailer::new).transpose() {
        Ok(mailer) => mailer,
        Err(e) => {
            error!(error = %e, "mailer setup failed");
            return ExitCode::FAILURE;
        }
    };
    if mailer.is_none() {
        warn!("BREVO_API_KEY not set, reports will not be emailed");
    }

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(bind = %config.bind_addr, error = %e, "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState {
        db,
        registry,
        mailer,
    };

    info!(%addr, workers = config.workers, "starting server");
    let server = Server::bind(&addr).max_workers(config.workers);

    let result = server.serve(move |req: Request, _info: ConnectionInfo| {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        let resp = match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        };

        info!(
            %method,
            %path,
            status = resp.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        resp
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        return ExitCode::FAILURE;
    }

    info!("server shut down cleanly");
    ExitCode::SUCCESS
}
