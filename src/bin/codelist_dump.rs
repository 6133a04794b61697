use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use codelist_cache::{
    CacheConfig, CodeListId, CodeListKey, CodeListQueryService, CodeValue, JsonFileSource,
    init_logging,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::runtime::Runtime;
use tracing::info;

#[derive(Debug, Clone)]
struct CliOptions {
    source: PathBuf,
    lists: Vec<CodeListId>,
    active_only: bool,
    output: Option<PathBuf>,
    pretty: bool,
}

#[derive(Debug, serde::Serialize)]
struct CodeListReport {
    #[serde(flatten)]
    key: CodeListKey,
    value_count: usize,
    values: Vec<CodeValue>,
}

#[derive(Debug, serde::Serialize)]
struct DumpReport {
    generated_at_ms: i64,
    source: String,
    active_only: bool,
    list_count: usize,
    lists: Vec<CodeListReport>,
}

fn usage() -> &'static str {
    "Usage: codelist_dump --source <file.json> [--list <id>]... [--active-only] [--output <path>] [--pretty]"
}

fn write_output(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

fn emit_payload(target: Option<&Path>, payload: &str) -> Result<()> {
    if let Some(path) = target {
        write_output(path, payload)?;
        println!("Code lists written to {}", path.display());
    } else {
        println!("{payload}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(args)?;

    let config = CacheConfig::from_env();
    config.validate().context("Invalid configuration")?;
    init_logging(&config.logging.filter);

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = rt.block_on(async {
        collect_report(&options, &config)
            .await
            .with_context(|| {
                format!("Failed to load code lists from {}", options.source.display())
            })
    })?;

    let payload = to_json(&report, options.pretty)?;
    emit_payload(options.output.as_deref(), &payload)
}

async fn collect_report(options: &CliOptions, config: &CacheConfig) -> Result<DumpReport> {
    let source = Arc::new(JsonFileSource::new(options.source.clone()));
    let service = CodeListQueryService::new(source, config);
    service.full_reload().await?;

    let ids: Vec<CodeListId> = if options.lists.is_empty() {
        service
            .get_all_code_lists()
            .await
            .into_iter()
            .map(|key| key.list_id)
            .collect()
    } else {
        options.lists.clone()
    };

    let mut lists = Vec::with_capacity(ids.len());
    for id in ids {
        let key = service
            .get_code_list(id)
            .await?
            .unwrap_or_else(|| CodeListKey::bare(id));
        let values = service.get_all_values(id, options.active_only).await?;
        lists.push(CodeListReport {
            key,
            value_count: values.len(),
            values,
        });
    }
    info!(lists = lists.len(), "Code list dump collected");

    Ok(DumpReport {
        generated_at_ms: Utc::now().timestamp_millis(),
        source: options.source.display().to_string(),
        active_only: options.active_only,
        list_count: lists.len(),
        lists,
    })
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut source: Option<PathBuf> = None;
    let mut lists = Vec::new();
    let mut active_only = false;
    let mut output: Option<PathBuf> = None;
    let mut pretty = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-s" | "--source" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--source requires a path\n{}", usage()))?;
                source = Some(PathBuf::from(path));
            }
            "-l" | "--list" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--list requires a value\n{}", usage()))?;
                lists.push(parse_list_id(&value)?);
            }
            "--active-only" => {
                active_only = true;
            }
            "-o" | "--output" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--output requires a path\n{}", usage()))?;
                output = Some(PathBuf::from(path));
            }
            "--pretty" => {
                pretty = true;
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {other}\n{}", usage()),
        }
    }

    let Some(source) = source else {
        bail!("--source is required\n{}", usage());
    };

    Ok(CliOptions {
        source,
        lists,
        active_only,
        output,
        pretty,
    })
}

fn parse_list_id(value: &str) -> Result<CodeListId> {
    let parsed: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid list id: {value}"))?;
    CodeListId::try_from(parsed).map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parse_args_collects_lists() {
        let options = parse_args(args(&[
            "--source",
            "lists.json",
            "--list",
            "101",
            "-l",
            "7",
            "--active-only",
            "--pretty",
        ]))
        .unwrap();

        assert_eq!(options.source, PathBuf::from("lists.json"));
        assert_eq!(options.lists, vec![CodeListId::new(101), CodeListId::new(7)]);
        assert!(options.active_only);
        assert!(options.pretty);
        assert!(options.output.is_none());
    }

    #[test]
    fn parse_args_requires_source() {
        let err = parse_args(args(&["--pretty"])).unwrap_err();
        assert!(err.to_string().contains("--source is required"));
    }

    #[test]
    fn parse_args_rejects_bad_list_id() {
        assert!(parse_args(args(&["--source", "a.json", "--list", "abc"])).is_err());
        assert!(parse_args(args(&["--source", "a.json", "--list", "9999999999"])).is_err());
    }

    #[test]
    fn write_output_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dump.json");
        write_output(&path, "[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
