//! # Tang 命令行工具
//!
//! 加载类型目录，注册给定的根类型，逐轮打印发现的未解析类型，最后输出命名空间树。

use anyhow::Context;
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tang_common::{HierarchyOptions, HierarchyResult, TypeName};
use tang_composition::{load_options, HierarchyBuilder, LoggingConfig};
use tang_di_abstractions::TypeSource;
use tang_di_impl::TypeHierarchy;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "tang")]
#[command(about = "解析类型层级并导出命名空间树")]
struct Args {
    /// 配置文件路径（TOML 或 JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 类型目录文件，可重复指定
    #[arg(long = "catalog", value_name = "FILE")]
    catalogs: Vec<PathBuf>,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,

    /// 闭包计算最大轮数，覆盖配置文件
    #[arg(long)]
    max_rounds: Option<usize>,

    /// 需要注册的根类型
    roots: Vec<String>,
}

impl Args {
    /// 命令行参数叠加到配置之上
    fn apply(&self, mut options: HierarchyOptions) -> HierarchyOptions {
        options.catalogs.extend(self.catalogs.iter().cloned());
        options
            .roots
            .extend(self.roots.iter().map(|r| TypeName::new(r.as_str())));
        if let Some(level) = &self.log_level {
            options.logging.level = level.clone();
        }
        if let Some(rounds) = self.max_rounds {
            options.max_closure_rounds = rounds;
        }
        options
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let options = load_options(args.config.as_deref()).context("加载配置失败")?;
    let options = args.apply(options);

    LoggingConfig::from_options(&options.logging)?.init()?;
    info!(
        catalogs = options.catalogs.len(),
        roots = options.roots.len(),
        "启动 Tang 类型层级解析"
    );

    let mut hierarchy = HierarchyBuilder::from_options(options)
        .load_hierarchy()
        .await
        .context("注册根类型失败")?;

    resolve_with_report(&mut hierarchy, |text| print!("{text}"))
        .context("计算类型闭包失败")?;

    print!("{}", hierarchy.export_namespace());
    Ok(())
}

/// 计算类型闭包并逐轮报告进度，返回执行的轮数
///
/// 每轮在下一轮开始或闭包收敛时以 "Done." 收尾。
fn resolve_with_report<S: TypeSource>(
    hierarchy: &mut TypeHierarchy<S>,
    mut emit: impl FnMut(&str),
) -> HierarchyResult<usize> {
    let rounds = hierarchy.resolve_all_classes_with(|round, unresolved| {
        if round > 1 {
            emit("Done.\n");
        }
        emit(&render_round(unresolved));
    })?;
    if rounds > 0 {
        emit("Done.\n");
    }
    Ok(rounds)
}

/// 一轮闭包计算的输出：标题行，之后每个待加载类型一行
fn render_round(unresolved: &BTreeSet<TypeName>) -> String {
    let mut out = String::from("Found unresolved classes.  Loading them.\n");
    for type_name in unresolved {
        out.push_str(&format!("  {type_name}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tang_common::{ConstructorDescriptor, ParameterDescriptor, TypeDescriptor};
    use tang_di_impl::TypeCatalog;

    fn needs(name: &str, dependency: &str) -> TypeDescriptor {
        let parameter = ParameterDescriptor::positional(dependency);
        TypeDescriptor::new(name)
            .with_constructor(ConstructorDescriptor::injectable(vec![parameter]))
    }

    #[test]
    fn test_report_closes_every_round() {
        let catalog = TypeCatalog::from_descriptors([
            needs("x.A", "x.B"),
            needs("x.B", "x.C"),
            TypeDescriptor::new("x.C"),
        ])
        .unwrap();
        let mut hierarchy = TypeHierarchy::new(catalog);
        hierarchy.register_class(&TypeName::new("x.A")).unwrap();

        let mut out = String::new();
        let rounds = resolve_with_report(&mut hierarchy, |text| out.push_str(text));
        assert_eq!(rounds.unwrap(), 2);
        assert_eq!(
            out,
            "Found unresolved classes.  Loading them.\n  x.B\nDone.\n\
             Found unresolved classes.  Loading them.\n  x.C\nDone.\n"
        );
    }

    #[test]
    fn test_report_is_silent_when_closed() {
        let catalog = TypeCatalog::from_descriptors([TypeDescriptor::new("x.C")]).unwrap();
        let mut hierarchy = TypeHierarchy::new(catalog);
        hierarchy.register_class(&TypeName::new("x.C")).unwrap();

        let mut out = String::new();
        let rounds = resolve_with_report(&mut hierarchy, |text| out.push_str(text));
        assert_eq!(rounds.unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_render_round_lists_one_type_per_line() {
        let unresolved: BTreeSet<TypeName> =
            ["pkg.B", "pkg.A"].into_iter().map(TypeName::new).collect();
        assert_eq!(
            render_round(&unresolved),
            "Found unresolved classes.  Loading them.\n  pkg.A\n  pkg.B\n"
        );
    }

    #[test]
    fn test_args_override_options() {
        let args = Args::try_parse_from([
            "tang",
            "--catalog",
            "a.json",
            "--catalog",
            "b.toml",
            "--log-level",
            "debug",
            "--max-rounds",
            "3",
            "com.example.Timer",
        ])
        .unwrap();

        let base = HierarchyOptions {
            catalogs: vec![PathBuf::from("base.json")],
            ..HierarchyOptions::default()
        };
        let options = args.apply(base);

        assert_eq!(
            options.catalogs,
            vec![
                PathBuf::from("base.json"),
                PathBuf::from("a.json"),
                PathBuf::from("b.toml")
            ]
        );
        assert_eq!(options.roots, vec![TypeName::new("com.example.Timer")]);
        assert_eq!(options.logging.level, "debug");
        assert_eq!(options.max_closure_rounds, 3);
    }

    #[test]
    fn test_defaults_keep_options() {
        let args = Args::try_parse_from(["tang"]).unwrap();
        let options = args.apply(HierarchyOptions::default());
        assert_eq!(options, HierarchyOptions::default());
    }
}
