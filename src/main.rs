use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thingrepo::{
  adapters::http::{
    AuthMiddleware, RequestIdMiddleware, configure_auth_routes, configure_company_routes,
    health_check,
  },
  application::auth::{SignInUserUseCase, SignUpUserUseCase},
  application::company::AddCompanyUseCase,
  domain::auth::services::AuthService,
  domain::company::CompanyService,
  domain::transaction::TransactionManager,
  infrastructure::{
    config::Config,
    persistence::memory::{
      MemoryCompanyRepository, MemoryCredentialRepository, MemoryDatabase,
      MemoryDepartmentRepository, MemoryRightsRepository, MemoryUserRepository,
    },
    persistence::postgres::{
      PostgresCompanyRepository, PostgresCredentialRepository, PostgresDepartmentRepository,
      PostgresRightsRepository, PostgresTransactionManager, PostgresUserRepository,
    },
    security::{Argon2PasswordHasher, JwtTokenIssuer},
  },
};

/// Use cases served over HTTP for one storage backend
struct UseCases<M: TransactionManager> {
  sign_in: Arc<SignInUserUseCase<M>>,
  sign_up: Arc<SignUpUserUseCase<M>>,
  add_company: Arc<AddCompanyUseCase<M>>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "thingrepo=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting thingrepo");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid configuration: {}", e),
    )
  })?;
  tracing::info!("Configuration loaded successfully");

  let password_hasher = Arc::new(Argon2PasswordHasher::new().map_err(|e| {
    tracing::error!("Failed to create password hasher: {}", e);
    std::io::Error::other(format!("Password hasher error: {}", e))
  })?);
  let token_issuer = Arc::new(JwtTokenIssuer::new(
    &config.security.jwt_secret,
    config.security.token_ttl_seconds,
  ));

  if config.database.is_memory() {
    tracing::warn!("Using in-memory storage, data is lost on shutdown");

    let db = Arc::new(MemoryDatabase::new());
    let user_repo = Arc::new(MemoryUserRepository::new());

    let auth_service = Arc::new(AuthService::new(
      db.clone(),
      user_repo.clone(),
      Arc::new(MemoryCredentialRepository::new()),
      password_hasher,
      token_issuer.clone(),
    ));
    let company_service = Arc::new(CompanyService::new(
      db,
      Arc::new(MemoryCompanyRepository::new()),
      Arc::new(MemoryDepartmentRepository::new()),
      Arc::new(MemoryRightsRepository::new()),
      user_repo,
    ));

    return run_server(
      config,
      token_issuer,
      UseCases {
        sign_in: Arc::new(SignInUserUseCase::new(auth_service.clone())),
        sign_up: Arc::new(SignUpUserUseCase::new(auth_service)),
        add_company: Arc::new(AddCompanyUseCase::new(company_service)),
      },
    )
    .await;
  }

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  let tx_manager = Arc::new(PostgresTransactionManager::new(db_pool));
  let user_repo = Arc::new(PostgresUserRepository::new());

  let auth_service = Arc::new(AuthService::new(
    tx_manager.clone(),
    user_repo.clone(),
    Arc::new(PostgresCredentialRepository::new()),
    password_hasher,
    token_issuer.clone(),
  ));
  let company_service = Arc::new(CompanyService::new(
    tx_manager,
    Arc::new(PostgresCompanyRepository::new()),
    Arc::new(PostgresDepartmentRepository::new()),
    Arc::new(PostgresRightsRepository::new()),
    user_repo,
  ));

  run_server(
    config,
    token_issuer,
    UseCases {
      sign_in: Arc::new(SignInUserUseCase::new(auth_service.clone())),
      sign_up: Arc::new(SignUpUserUseCase::new(auth_service)),
      add_company: Arc::new(AddCompanyUseCase::new(company_service)),
    },
  )
  .await
}

async fn run_server<M: TransactionManager>(
  config: Config,
  token_issuer: Arc<JwtTokenIssuer>,
  use_cases: UseCases<M>,
) -> std::io::Result<()> {
  let governor_conf = GovernorConfigBuilder::default()
    .per_second(config.rate_limit.auth_replenish_seconds)
    .burst_size(config.rate_limit.auth_burst_size)
    .finish()
    .ok_or_else(|| {
      std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "Rate limit period and burst size must be non-zero",
      )
    })?;

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  let UseCases {
    sign_in,
    sign_up,
    add_company,
  } = use_cases;

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      // Public auth endpoints, rate limited per peer address
      .service(
        web::scope("/api/v1/auth")
          .wrap(Governor::new(&governor_conf))
          .configure(|cfg| configure_auth_routes(cfg, sign_in.clone(), sign_up.clone())),
      )
      .service(
        web::scope("/api/v1/companies")
          .wrap(AuthMiddleware::new(token_issuer.clone()))
          .configure(|cfg| configure_company_routes(cfg, add_company.clone())),
      )
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
