//! 应用运行配置加载。
//!
//! 先读取 `coha.yaml`（依次查找 `/etc/coha/`、`$HOME/.coha/`、当前目录，取第一个存在的），
//! 再用 `COHA_*` 环境变量逐项覆盖。

use domain::DEFAULT_MEASUREMENT;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 配置文件名。
pub const CONFIG_FILE_NAME: &str = "coha.yaml";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("config file {path}: {message}")]
    File { path: String, message: String },
}

/// 批次接入方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Zmq,
    Mqtt,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "zmq" => Ok(Self::Zmq),
            "mqtt" => Ok(Self::Mqtt),
            other => Err(other.to_string()),
        }
    }
}

/// 配置文件内容，键名沿用 `ZmqSocket`、`InfluxUrl` 这类写法，匹配时不区分大小写。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileConfig {
    pub transport: Option<String>,
    pub zmq_socket: Option<String>,
    pub zmq_subscribe: Option<String>,
    pub mqtt_host: Option<String>,
    pub mqtt_port: Option<u16>,
    pub mqtt_topic: Option<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub influx_url: Option<String>,
    pub influx_token: Option<String>,
    pub influx_organisation: Option<String>,
    pub influx_bucket: Option<String>,
    pub influx_timeout_seconds: Option<u64>,
    pub measurement: Option<String>,
    pub filter_pass: Option<Vec<String>>,
}

/// `FileConfig` 的全部键名，顺序与字段一致。
const FILE_KEYS: &[&str] = &[
    "Transport",
    "ZmqSocket",
    "ZmqSubscribe",
    "MqttHost",
    "MqttPort",
    "MqttTopic",
    "MqttUsername",
    "MqttPassword",
    "InfluxUrl",
    "InfluxToken",
    "InfluxOrganisation",
    "InfluxBucket",
    "InfluxTimeoutSeconds",
    "Measurement",
    "FilterPass",
];

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml).map_err(|err| ConfigError::File {
            path: "<inline>".to_string(),
            message: err.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file_error = |message: String| ConfigError::File {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|err| file_error(err.to_string()))?;
        Self::parse(&content).map_err(|err| file_error(err.to_string()))
    }

    fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        serde_yaml::from_value(canonical_keys(value))
    }

    /// 在默认搜索路径中查找配置文件；都不存在时返回 None。
    pub fn discover() -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for dir in search_dirs() {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                let config = Self::from_file(&path)?;
                return Ok(Some((path, config)));
            }
        }
        Ok(None)
    }
}

/// 配置文件搜索目录（按优先级）。
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("/etc/coha")];
    if let Some(home) = env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".coha"));
    }
    dirs.push(PathBuf::from("."));
    dirs
}

// 顶层键按 FILE_KEYS 忽略大小写改写成规范写法；未知键原样保留。
fn canonical_keys(value: serde_yaml::Value) -> serde_yaml::Value {
    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        // 空文件
        serde_yaml::Value::Null => serde_yaml::Mapping::new(),
        other => return other,
    };
    let mapping = mapping
        .into_iter()
        .map(|(key, value)| {
            let canonical = key
                .as_str()
                .and_then(|name| FILE_KEYS.iter().find(|known| known.eq_ignore_ascii_case(name)));
            match canonical {
                Some(known) => (serde_yaml::Value::String((*known).to_string()), value),
                None => (key, value),
            }
        })
        .collect::<serde_yaml::Mapping>();
    serde_yaml::Value::Mapping(mapping)
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 实际读取的配置文件（仅由环境变量提供时为 None）。
    pub source: Option<PathBuf>,
    pub transport: Transport,
    pub zmq_socket: String,
    pub zmq_subscribe: String,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_topic: String,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub influx_url: String,
    pub influx_token: String,
    pub influx_organisation: String,
    pub influx_bucket: String,
    pub influx_timeout_seconds: u64,
    pub measurement: String,
    pub filter_pass: Vec<String>,
}

impl AppConfig {
    /// 从默认搜索路径的配置文件和进程环境变量读取配置。
    pub fn load() -> Result<Self, ConfigError> {
        let (source, file) = match FileConfig::discover()? {
            Some((path, file)) => (Some(path), file),
            None => (None, FileConfig::default()),
        };
        let mut config = Self::resolve(file, |key| env::var(key).ok())?;
        config.source = source;
        Ok(config)
    }

    /// 合并配置文件与环境变量（`lookup` 返回环境变量值，空串视为未设置）。
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = match pick(&lookup, "COHA_TRANSPORT", file.transport) {
            Some(value) => value
                .parse::<Transport>()
                .map_err(|value| ConfigError::Invalid("Transport".to_string(), value))?,
            None => Transport::Zmq,
        };

        let zmq_socket = pick(&lookup, "COHA_ZMQ_SOCKET", file.zmq_socket);
        let mqtt_host = pick(&lookup, "COHA_MQTT_HOST", file.mqtt_host);
        let (zmq_socket, mqtt_host) = match transport {
            Transport::Zmq => (
                required(zmq_socket, "ZmqSocket", "COHA_ZMQ_SOCKET")?,
                mqtt_host.unwrap_or_default(),
            ),
            Transport::Mqtt => (
                zmq_socket.unwrap_or_default(),
                required(mqtt_host, "MqttHost", "COHA_MQTT_HOST")?,
            ),
        };

        let influx_url = required(
            pick(&lookup, "COHA_INFLUX_URL", file.influx_url),
            "InfluxUrl",
            "COHA_INFLUX_URL",
        )?;
        let influx_token = required(
            pick(&lookup, "COHA_INFLUX_TOKEN", file.influx_token),
            "InfluxToken",
            "COHA_INFLUX_TOKEN",
        )?;
        let influx_organisation = required(
            pick(&lookup, "COHA_INFLUX_ORGANISATION", file.influx_organisation),
            "InfluxOrganisation",
            "COHA_INFLUX_ORGANISATION",
        )?;
        let influx_bucket = required(
            pick(&lookup, "COHA_INFLUX_BUCKET", file.influx_bucket),
            "InfluxBucket",
            "COHA_INFLUX_BUCKET",
        )?;

        let filter_pass = match read_optional(&lookup, "COHA_FILTER_PASS") {
            Some(value) => split_list(&value),
            None => file.filter_pass.unwrap_or_default(),
        };

        Ok(Self {
            source: None,
            transport,
            zmq_socket,
            zmq_subscribe: pick(&lookup, "COHA_ZMQ_SUBSCRIBE", file.zmq_subscribe)
                .unwrap_or_default(),
            mqtt_host,
            mqtt_port: read_with_default(&lookup, "COHA_MQTT_PORT", file.mqtt_port, 1883)?,
            mqtt_topic: pick(&lookup, "COHA_MQTT_TOPIC", file.mqtt_topic)
                .unwrap_or_else(|| "coha/#".to_string()),
            mqtt_username: pick(&lookup, "COHA_MQTT_USERNAME", file.mqtt_username),
            mqtt_password: pick(&lookup, "COHA_MQTT_PASSWORD", file.mqtt_password),
            influx_url,
            influx_token,
            influx_organisation,
            influx_bucket,
            influx_timeout_seconds: read_with_default(
                &lookup,
                "COHA_INFLUX_TIMEOUT_SECONDS",
                file.influx_timeout_seconds,
                10,
            )?,
            measurement: pick(&lookup, "COHA_MEASUREMENT", file.measurement)
                .unwrap_or_else(|| DEFAULT_MEASUREMENT.to_string()),
            filter_pass,
        })
    }
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// 环境变量优先，其次配置文件。
fn pick<F>(lookup: &F, key: &str, file_value: Option<String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    read_optional(lookup, key).or(file_value.filter(|value| !value.is_empty()))
}

fn required(value: Option<String>, file_key: &str, env_key: &str) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::Missing(format!("{file_key} ({env_key})")))
}

fn read_with_default<F, T>(
    lookup: &F,
    key: &str,
    file_value: Option<T>,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match read_optional(lookup, key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        None => Ok(file_value.unwrap_or(default)),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
