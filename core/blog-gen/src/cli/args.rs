use crate::domain::{BlogCommand, SettingsOverrides};
use clap::builder::ArgAction;
use clap::value_parser;
use common::error::Error;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// --serve: Lambda Runtime API のループを回す
    pub serve: bool,
    /// -t / --topic: このトピックで 1 回だけ処理する
    pub topic: Option<String>,
    /// -e / --event: API Gateway 形式のイベント JSON ファイル（"-" で stdin）
    pub event_file: Option<PathBuf>,
    pub model: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// --echo: Bedrock を呼ばずプロンプトを返す推論を使う
    pub echo: bool,
    /// -v / --verbose: debug レベルまでログを出す
    pub verbose: bool,
}

impl Config {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            model_id: self.model.clone(),
            echo: self.echo,
            verbose: self.verbose,
        }
    }
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("blog-gen")
        .about("Generate a short blog post with Bedrock and store it in S3")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("serve")
                .long("serve")
                .help("Run the Lambda Runtime API loop")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["topic", "event"]),
        )
        .arg(
            clap::Arg::new("topic")
                .short('t')
                .long("topic")
                .value_name("topic")
                .help("Generate a blog on this topic once and print the response")
                .num_args(1)
                .conflicts_with("event"),
        )
        .arg(
            clap::Arg::new("event")
                .short('e')
                .long("event")
                .value_name("file")
                .help("Handle this API Gateway event JSON file once (- for stdin)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Bedrock model id")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("bucket")
                .short('b')
                .long("bucket")
                .value_name("bucket")
                .help("Destination S3 bucket")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("region")
                .short('r')
                .long("region")
                .value_name("region")
                .help("AWS region for Bedrock and S3")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("echo")
                .long("echo")
                .help("Use the offline echo inference instead of Bedrock")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit debug logs")
                .action(ArgAction::SetTrue),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        serve: matches.get_flag("serve"),
        topic: matches.get_one::<String>("topic").cloned(),
        event_file: matches.get_one::<PathBuf>("event").cloned(),
        model: matches.get_one::<String>("model").cloned(),
        bucket: matches.get_one::<String>("bucket").cloned(),
        region: matches.get_one::<String>("region").cloned(),
        echo: matches.get_flag("echo"),
        verbose: matches.get_flag("verbose"),
    }
}

pub fn parse_args() -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// トピックから API Gateway プロキシ形式のイベントを作る
pub fn event_for_topic(topic: &str) -> Value {
    json!({ "body": json!({ "blog_topic": topic }).to_string() })
}

fn read_event_file(path: &Path) -> Result<Value, Error> {
    let text = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        fs::read_to_string(path)
            .map_err(|e| Error::io_msg(format!("{}: {}", path.display(), e)))?
    };
    serde_json::from_str(&text)
        .map_err(|e| Error::invalid_argument(format!("{}: invalid event JSON: {}", path.display(), e)))
}

/// Config を BlogCommand に変換する
///
/// -t / -e が無く `runtime_api` が設定されていれば Serve（Lambda 上の起動）。
pub fn config_to_command(config: &Config, runtime_api: Option<&str>) -> Result<BlogCommand, Error> {
    if config.help {
        return Ok(BlogCommand::Help);
    }
    if config.serve {
        return Ok(BlogCommand::Serve);
    }
    if let Some(topic) = &config.topic {
        return Ok(BlogCommand::Invoke {
            event: event_for_topic(topic),
        });
    }
    if let Some(path) = &config.event_file {
        return Ok(BlogCommand::Invoke {
            event: read_event_file(path)?,
        });
    }
    if runtime_api.is_some() {
        return Ok(BlogCommand::Serve);
    }
    Err(Error::invalid_argument(
        "No topic or event given. Use -t <topic>, -e <file> or --serve.",
    ))
}
