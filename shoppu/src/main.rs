use std::net::TcpListener;

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};
use shoppu::{
    cli::CLIArgs,
    logging::initialize_tracing,
    server::build_http_server,
    state::ApplicationStateInner,
};
use shoppu_configuration::Configuration;
use tracing::info;



#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(feature = "with_test_facilities")]
    {
        println!("-------------------------------------");
        println!("THIS IS AN INCREDIBLY IMPORTANT ERROR");
        println!("-------------------------------------");
        println!(
            "THIS BINARY HAS BEEN COMPILED WITH THE with_test_facilities FEATURE FLAG, \n\
            WHICH MEANS IT SHOULD ONLY BE USED FOR TESTING. IF YOU USE THIS IN PRODUCTION, \n\
            ANYONE CAN WIPE YOUR DATABASE REMOTELY. YOU HAVE BEEN WARNED"
        );
        println!("-------------------------------------");
        println!("THIS IS AN INCREDIBLY IMPORTANT ERROR");
        println!("-------------------------------------");
    }


    let arguments = CLIArgs::parse();

    let configuration = match arguments.configuration_file_path.as_ref() {
        Some(path) => {
            println!("Loading configuration: {}", path.display());
            Configuration::load_from_path(path)
        }
        None => {
            println!("Loading configuration at default path.");
            Configuration::load_from_default_path()
        }
    }
    .into_diagnostic()
    .wrap_err("Failed to load configuration file.")?;


    configuration
        .logging
        .create_log_file_output_directory_if_missing()
        .into_diagnostic()
        .wrap_err("Failed to create log file output directory.")?;

    let guard = initialize_tracing(
        configuration.logging.console_output_level_filter(),
        configuration.logging.log_file_output_level_filter(),
        &configuration.logging.log_file_output_directory,
        "shoppu.log",
    )
    .into_diagnostic()
    .wrap_err("Failed to initialize tracing.")?;

    info!(
        file_path = %configuration.configuration_file_path.display(),
        "Configuration loaded."
    );


    let host = configuration.http.host.clone();
    let port = configuration.http.port;

    let state = actix_web::web::Data::new(
        ApplicationStateInner::new(configuration)
            .await
            .into_diagnostic()
            .wrap_err("Failed to set up the database.")?,
    );

    if state.configuration.http.anti_forgery_token.is_none() {
        info!("No anti-forgery token configured, generated a random one.");
    }


    let listener = TcpListener::bind((host.as_str(), port))
        .into_diagnostic()
        .wrap_err("Failed to bind the HTTP server to the configured address.")?;

    let server = build_http_server(state, listener, None)
        .into_diagnostic()
        .wrap_err("Failed to set up actix HTTP server.")?;

    info!(
        host = host.as_str(),
        port,
        "HTTP server initialized and running."
    );

    server
        .await
        .into_diagnostic()
        .wrap_err("Errored while running actix HTTP server.")?;


    drop(guard);

    Ok(())
}
