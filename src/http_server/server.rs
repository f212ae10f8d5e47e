//! # HTTP Server
//!
//! Opens one store per resource type, wires them into their routers and
//! serves the combined API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthService, InMemorySessionRegistry, SessionRegistry};
use crate::resources::{Classified, Company, Listing, RealEstate, Vacancy};
use crate::store::{JsonFilePersistence, MemoryPersistence, Persistence, ResourceStore, StoreResult};

use super::auth_routes::auth_routes;
use super::config::{ServerConfig, StorageBackend};
use super::listing_routes::{listing_routes, ListingState};
use super::observability_routes::{health_routes, CollectionStats};

/// HTTP server for the marketplace API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Open all stores described by `config` and build the router
    ///
    /// Fails if a collection cannot be loaded under the configured
    /// corruption policy.
    pub fn with_config(config: ServerConfig) -> StoreResult<Self> {
        let persistence: Arc<dyn Persistence> = match config.storage.backend {
            StorageBackend::Json => {
                tracing::info!(data_dir = %config.storage.data_dir.display(), "using json file storage");
                Arc::new(JsonFilePersistence::new(&config.storage.data_dir))
            }
            StorageBackend::Memory => {
                tracing::info!("using in-memory storage");
                Arc::new(MemoryPersistence::new())
            }
        };
        Self::with_persistence(config, persistence)
    }

    /// Like [`with_config`](Self::with_config), but over a caller-supplied
    /// persistence adapter; `config.storage.backend` is ignored
    pub fn with_persistence(
        config: ServerConfig,
        persistence: Arc<dyn Persistence>,
    ) -> StoreResult<Self> {
        let sessions: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());

        let router = Self::build_router(&config, persistence, sessions)?;
        Ok(Self { config, router })
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &ServerConfig,
        persistence: Arc<dyn Persistence>,
        sessions: Arc<dyn SessionRegistry>,
    ) -> StoreResult<Router> {
        let seed = config.storage.id_seed;
        let policy = config.storage.on_corrupt;
        let protect = config.auth.protect_classified_create;

        let users = ResourceStore::open(persistence.clone(), seed, policy)?;
        let auth = Arc::new(AuthService::new(users, sessions));

        let classifieds = listing_state::<Classified>(&persistence, &auth, config, protect)?;
        let vacancies = listing_state::<Vacancy>(&persistence, &auth, config, protect)?;
        let companies = listing_state::<Company>(&persistence, &auth, config, protect)?;
        let real_estate = listing_state::<RealEstate>(&persistence, &auth, config, protect)?;

        let stats = vec![
            auth.clone() as Arc<dyn CollectionStats>,
            classifieds.clone() as Arc<dyn CollectionStats>,
            vacancies.clone() as Arc<dyn CollectionStats>,
            companies.clone() as Arc<dyn CollectionStats>,
            real_estate.clone() as Arc<dyn CollectionStats>,
        ];

        let router = Router::new()
            .merge(health_routes(stats))
            .merge(auth_routes(auth))
            .merge(listing_routes(classifieds))
            .merge(listing_routes(vacancies))
            .merge(listing_routes(companies))
            .merge(listing_routes(real_estate))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors_layer(&config.http.cors_origins)),
            );

        Ok(router)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.http.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "marketboard listening");
        axum::serve(listener, self.router).await
    }
}

fn listing_state<L: Listing>(
    persistence: &Arc<dyn Persistence>,
    auth: &Arc<AuthService>,
    config: &ServerConfig,
    protect_create: bool,
) -> StoreResult<Arc<ListingState<L>>> {
    let store = ResourceStore::open(
        persistence.clone(),
        config.storage.id_seed,
        config.storage.on_corrupt,
    )?;
    Ok(Arc::new(ListingState::new(store, auth.clone(), protect_create)))
}

/// CORS from configured origins; permissive when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
