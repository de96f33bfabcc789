mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;


use std::process;
use std::sync::Arc;

use anyhow::Context;
use adapter::{LambdaRuntimeClient, RUNTIME_API_VAR};
use cli::{config_to_command, parse_args, Config};
use common::adapter::{LogSink, StdClock, StdEnvResolver};
use common::error::Error;
use common::ports::outbound::{EnvResolver, LogLevel, LogRecord};
use domain::{BlogCommand, RuntimeError, Settings};
use ports::inbound::InvocationHandler;
use ports::outbound::RuntimeApi;
use serde_json::Value;
use usecase::runtime_loop::run_runtime_loop;
use wiring::{log_sink_for, wire_app, wire_log};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            let code = match e.downcast_ref::<Error>() {
                Some(err) => {
                    if err.is_usage() {
                        print_usage();
                    }
                    err.exit_code()
                }
                None => 70,
            };
            eprintln!("blog-gen: {:#}", e);
            code
        }
    };
    process::exit(exit_code);
}

fn run() -> anyhow::Result<i32> {
    let config = parse_args()?;
    let env: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let runtime_api = env.var(RUNTIME_API_VAR);
    let command = config_to_command(&config, runtime_api.as_deref())?;
    let sink = log_sink_for(&command);
    match command {
        BlogCommand::Help => {
            print_help();
            Ok(0)
        }
        BlogCommand::Serve => {
            let api = runtime_api
                .ok_or_else(|| Error::env(format!("{} is not set; --serve only works inside Lambda", RUNTIME_API_VAR)))?;
            serve(&config, env, &api, sink)
        }
        BlogCommand::Invoke { event } => invoke_once(&config, env, &event, sink),
    }
}

/// Lambda Runtime API のループ。設定の解決に失敗したら init/error を送って終了する
fn serve(config: &Config, env: Arc<dyn EnvResolver>, api: &str, sink: LogSink) -> anyhow::Result<i32> {
    let client = LambdaRuntimeClient::new(api)?;
    let settings = match Settings::resolve(env.as_ref(), &config.overrides()) {
        Ok(s) => s,
        Err(e) => {
            let _ = client.send_init_error(&RuntimeError::new("Runtime.ConfigError", e.to_string()));
            return Err(e).context("failed to resolve settings");
        }
    };
    let log = wire_log(&settings, sink);
    let _ = log.log(
        &LogRecord::new(LogLevel::Info, "runtime started")
            .layer("cli")
            .kind("lifecycle")
            .field("region", &*settings.region)
            .field("bucket", &*settings.bucket)
            .field("model_id", &*settings.model_id),
    );
    let app = wire_app(settings, env, Arc::new(StdClock), log);
    let handled = run_runtime_loop(&client, &app.handler, app.log.as_ref(), None)
        .context("runtime loop stopped")?;
    let _ = app.log.log(
        &LogRecord::new(LogLevel::Info, "runtime finished")
            .layer("cli")
            .kind("lifecycle")
            .field("invocations", handled),
    );
    Ok(0)
}

/// イベントを 1 回処理してレスポンス JSON を表示する。2xx なら 0、それ以外は 1
fn invoke_once(
    config: &Config,
    env: Arc<dyn EnvResolver>,
    event: &Value,
    sink: LogSink,
) -> anyhow::Result<i32> {
    let settings = Settings::resolve(env.as_ref(), &config.overrides())?;
    let log = wire_log(&settings, sink);
    let app = wire_app(settings, env, Arc::new(StdClock), log);
    let response = app.handler.handle(event);
    let json = serde_json::to_string_pretty(&response).context("failed to encode response")?;
    println!("{}", json);
    let code = if response.is_success() { 0 } else { 1 };
    let _ = app.log.log(
        &LogRecord::new(LogLevel::Debug, "command finished")
            .layer("cli")
            .kind("lifecycle")
            .field("status_code", response.status_code)
            .field("exit_code", code),
    );
    Ok(code)
}

fn print_usage() {
    eprintln!("Usage: blog-gen [-t topic | -e file | --serve] [options]");
}

fn print_help() {
    println!("Usage: blog-gen [-t topic | -e file | --serve] [options]");
    println!("Options:");
    println!("  -h, --help                Show this help message");
    println!("  -t, --topic <topic>       Generate a blog on this topic once and print the response");
    println!("  -e, --event <file>        Handle an API Gateway event JSON file once (- for stdin)");
    println!("      --serve               Run the Lambda Runtime API loop (default when AWS_LAMBDA_RUNTIME_API is set)");
    println!("  -m, --model <model>       Bedrock model id. Default: eu.meta.llama3-2-3b-instruct-v1:0");
    println!("  -b, --bucket <bucket>     Destination S3 bucket. Default: boto3-bedrock-genai-project");
    println!("  -r, --region <region>     AWS region for Bedrock and S3. Default: eu-west-1");
    println!("      --echo                Use the offline echo inference instead of Bedrock");
    println!("  -v, --verbose             Emit debug logs");
    println!();
    println!("Environment:");
    println!("  AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN   Credentials (resolved per call)");
    println!("  BLOG_GEN_REGION, S3_BUCKET_NAME, BLOG_GEN_MODEL_ID            Same as -r / -b / -m");
    println!("  BLOG_GEN_KEY_PREFIX     Object key prefix. Default: blog-output/");
    println!("  BLOG_GEN_KEY_SUFFIX     none | millis (append milliseconds to the key)");
    println!("  BLOG_GEN_TEMPERATURE, BLOG_GEN_TOP_P, BLOG_GEN_MAX_GEN_LEN   Sampling (0.5 / 0.9 / 512)");
    println!("  BLOG_GEN_READ_TIMEOUT_SECS   Model read timeout. Default: 300");
    println!("  BLOG_GEN_MAX_RETRIES    Retries after the first attempt. Default: 3");
    println!("  BLOG_GEN_BEDROCK_ENDPOINT, BLOG_GEN_S3_ENDPOINT   Endpoint overrides (S3 uses path-style)");
    println!("  BLOG_GEN_INFERENCE      bedrock | echo");
    println!("  BLOG_GEN_LOG_LEVEL      error | warn | info | debug. Default: info");
    println!();
    println!("Examples:");
    println!("  blog-gen -t cats");
    println!("  blog-gen --echo -t \"Rust on Lambda\" -b my-bucket -r us-east-1");
    println!("  blog-gen -e event.json");
}
