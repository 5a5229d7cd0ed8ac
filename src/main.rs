use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use chaincore::{api, blockchain, node, Node, NodeConfig};

/// Reads a configuration value from the environment, falling back to the
/// default when unset or unparsable
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn initialize_node() -> Node {
    let defaults = NodeConfig::default();
    let config = NodeConfig {
        difficulty: env_or("CHAINCORE_DIFFICULTY", defaults.difficulty),
        mining_reward: env_or("CHAINCORE_REWARD", defaults.mining_reward),
    };

    match Node::new(config) {
        Ok(node) => node,
        Err(err) => {
            // Only keypair generation can fail here; without entropy there
            // is no node to run
            error!("Failed to initialize node: {}", err);
            std::process::exit(1);
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::home,
        api::handlers::health,
        api::handlers::stats,
        api::handlers::get_chain,
        api::handlers::get_latest_block,
        api::handlers::get_block,
        api::handlers::get_confirmed_transactions,
        api::handlers::is_valid,
        api::handlers::get_length,
        api::handlers::mine_block,
        api::handlers::list_peers,
        api::handlers::add_peer,
        api::handlers::create_transaction,
        api::handlers::all_transactions,
        api::handlers::pending_transactions,
        api::handlers::token_balance,
        api::handlers::token_mint,
        api::handlers::token_transfer,
        api::handlers::create_wallet,
        api::handlers::wallet_address,
        api::handlers::wallet_sign,
        api::handlers::wallet_verify
    ),
    components(
        schemas(
            blockchain::Block,
            blockchain::Transaction,
            blockchain::DigitalSignature,
            node::HealthReport,
            node::StatsReport,
            api::handlers::TransactionRequest,
            api::handlers::MineResponse,
            api::handlers::WalletResponse
        )
    ),
    tags(
        (name = "chaincore", description = "Blockchain node API endpoints")
    ),
    info(
        title = "chaincore API",
        version = "0.1.0",
        description = "REST API of a proof-of-work blockchain node",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let node = web::Data::new(initialize_node());

    let port: u16 = env_or("CHAINCORE_PORT", 8080);
    info!("Starting HTTP server at http://localhost:{}", port);

    HttpServer::new(move || {
        // The UI polls from another origin
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let openapi = ApiDoc::openapi();

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(node.clone())
            .configure(api::configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
