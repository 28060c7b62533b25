use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use courier_core::{
    Command, CommandHandler, CourierError, Matcher, Mediator, MediatorConfig, Notification,
    NotificationHandler, StrategyKind, command_middleware, notification_middleware,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// `{"name": "..."}` or a bare name on the command line.
#[derive(Debug, Deserialize)]
struct Hello {
    name: String,
}

impl Command for Hello {
    type Output = String;
}

struct Greeter;

impl CommandHandler<Hello> for Greeter {
    fn handle(&self, command: &Hello) -> Result<String, CourierError> {
        if command.name.trim().is_empty() {
            return Err(CourierError::handler("name must not be empty"));
        }
        Ok(format!("Hello, {}!", command.name))
    }
}

/// `Hello("courier")` は専用 handler へ
struct SelfGreeter;

impl CommandHandler<Hello> for SelfGreeter {
    fn handle(&self, _command: &Hello) -> Result<String, CourierError> {
        Ok("That's me.".to_string())
    }

    fn matcher(&self) -> Matcher<Hello> {
        Matcher::when(|hello: &Hello| hello.name == "courier")
    }
}

/// Greeter と SelfGreeter が同じ command を取り合わないようにする
struct Everyone;

impl CommandHandler<Hello> for Everyone {
    fn handle(&self, command: &Hello) -> Result<String, CourierError> {
        Greeter.handle(command)
    }

    fn matcher(&self) -> Matcher<Hello> {
        Matcher::when(|hello: &Hello| hello.name != "courier")
    }
}

#[derive(Debug)]
struct Greeted {
    name: String,
}

impl Notification for Greeted {}

#[derive(Default)]
struct Guestbook {
    names: Mutex<Vec<String>>,
}

impl NotificationHandler<Greeted> for Guestbook {
    fn handle(&self, notification: &Greeted) -> Result<(), CourierError> {
        let mut names = self
            .names
            .lock()
            .map_err(|_| CourierError::handler("guestbook lock poisoned"))?;
        names.push(notification.name.clone());
        info!(guests = names.len(), name = %notification.name, "signed the guestbook");
        Ok(())
    }
}

/// 名前が長すぎると失敗する
struct Badge;

impl NotificationHandler<Greeted> for Badge {
    fn handle(&self, notification: &Greeted) -> Result<(), CourierError> {
        if notification.name.len() > 12 {
            return Err(CourierError::handler(format!(
                "name too long for a badge: {}",
                notification.name
            )));
        }
        info!(name = %notification.name, "printed a badge");
        Ok(())
    }
}

fn parse_hello(arg: &str) -> Hello {
    serde_json::from_str(arg).unwrap_or_else(|_| Hello {
        name: arg.to_string(),
    })
}

/// `COURIER_CONFIG` (JSON) を読み、`COURIER_STRATEGY` で strategy を上書き
fn load_config() -> Result<MediatorConfig, CourierError> {
    let mut config = match std::env::var("COURIER_CONFIG") {
        Ok(json) => MediatorConfig::from_json(&json)?,
        Err(_) => MediatorConfig::default(),
    };
    if let Ok(name) = std::env::var("COURIER_STRATEGY") {
        config.notification_strategy = name.parse::<StrategyKind>()?;
    }
    Ok(config)
}

fn run() -> Result<(), CourierError> {
    let config = load_config()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(4)
        .thread_name("courier-pool")
        .build()
        .map_err(|e| CourierError::illegal_argument(format!("cannot start worker pool: {e}")))?;

    info!(strategy = %config.notification_strategy, route_cache = config.route_cache, "starting");

    let mediator = Mediator::builder()
        .config(config)
        .worker_pool(runtime.handle().clone())
        .command_handler::<Hello, _>(SelfGreeter)
        .command_handler::<Hello, _>(Everyone)
        .notification_handler::<Greeted, _>(Guestbook::default())
        .notification_handler::<Greeted, _>(Badge)
        .command_middleware(command_middleware(|command, next| {
            let started = Instant::now();
            let reply = next.run();
            info!(
                command = %command.short_name(),
                ok = reply.is_ok(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "handled command"
            );
            reply
        }))
        .notification_middleware(notification_middleware(|notification, next| {
            next.run().inspect_err(|e| {
                warn!(notification = %notification.short_name(), error = %e, "listener failed");
            })
        }))
        .build()?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        args.push("world".to_string());
    }

    for arg in args {
        let hello = parse_hello(&arg);
        let name = hello.name.clone();
        match hello.execute(&mediator) {
            Ok(reply) => println!("{reply}"),
            Err(e) => {
                error!(error = %e, "send failed");
                continue;
            }
        }

        if let Err(e) = (Greeted { name }).publish_to(&mediator) {
            match e {
                CourierError::Aggregate(aggregate) => {
                    for failure in &aggregate {
                        error!(error = %failure, "notification failure");
                    }
                }
                other => error!(error = %other, "publish failed"),
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "courier-cli failed");
            ExitCode::FAILURE
        }
    }
}
