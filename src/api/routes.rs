use actix_web::web;

use super::handlers;

/// Configures the API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::home))
        .route("/health", web::get().to(handlers::health))
        .route("/stats", web::get().to(handlers::stats))
        .service(
            web::scope("/blockchain")
                .route("/chain", web::get().to(handlers::get_chain))
                .route("/latest", web::get().to(handlers::get_latest_block))
                .route("/block/{index}", web::get().to(handlers::get_block))
                .route(
                    "/transactions",
                    web::get().to(handlers::get_confirmed_transactions),
                )
                .route("/isValid", web::get().to(handlers::is_valid))
                .route("/length", web::get().to(handlers::get_length)),
        )
        .service(web::scope("/mining").route("/mine", web::post().to(handlers::mine_block)))
        .service(
            web::scope("/peer")
                .route("/list", web::get().to(handlers::list_peers))
                .route("/add", web::post().to(handlers::add_peer)),
        )
        .service(
            web::scope("/transaction")
                .route("/create", web::post().to(handlers::create_transaction))
                .route("/all", web::get().to(handlers::all_transactions))
                .route("/pending", web::get().to(handlers::pending_transactions)),
        )
        .service(
            web::scope("/token")
                .route("/balance", web::get().to(handlers::token_balance))
                .route("/mint", web::post().to(handlers::token_mint))
                .route("/transfer", web::post().to(handlers::token_transfer)),
        )
        .service(
            web::scope("/wallet")
                .route("/create", web::post().to(handlers::create_wallet))
                .route("/address", web::get().to(handlers::wallet_address))
                .route("/sign", web::post().to(handlers::wallet_sign))
                .route("/verify", web::post().to(handlers::wallet_verify)),
        );
}
