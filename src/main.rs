//
// SPDX-License-Identifier: MIT
//

use clap::{App, Arg};

use dvrd::config::Config;
use dvrd::consts::TICK_SLEEP;
use dvrd::error::Error;
use dvrd::forwarding::SystemForwardingPlane;
use dvrd::instance::Instance;
use dvrd::network::Network;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = App::new("dvrd")
        .about("Distance-vector routing daemon")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Path to the JSON configuration file")
                .takes_value(true)
                .required(true),
        )
        .get_matches();

    let config_path = matches.value_of("config").expect("required by clap");

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(error) => {
            Error::ConfigLoad(error).log();
            std::process::exit(1);
        }
    };
    let listen_port = config.listen_port;

    let network = match Network::bind(listen_port).await {
        Ok(network) => network,
        Err(error) => {
            Error::SocketBind(error).log();
            std::process::exit(1);
        }
    };

    let mut instance = Instance::new(config, network, Box::new(SystemForwardingPlane));
    instance.initial_sync();

    loop {
        instance.tick().await;
        tokio::time::sleep(TICK_SLEEP).await;
    }
}
