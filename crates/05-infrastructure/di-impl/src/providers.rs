//! 类型目录提供者实现

use crate::catalog::CatalogFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tang_common::{CatalogError, TypeDescriptor};
use tang_di_abstractions::{CatalogProvider, FileCatalogProvider};
use tracing::debug;

/// JSON 目录提供者
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    file_path: PathBuf,
}

impl JsonCatalogProvider {
    /// 创建新的 JSON 目录提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogProvider for JsonCatalogProvider {
    async fn load(&self) -> Result<Vec<TypeDescriptor>, CatalogError> {
        let content = read_catalog(&self.file_path).await?;
        let file: CatalogFile =
            serde_json::from_str(&content).map_err(|e| CatalogError::ParseError {
                path: self.file_path.display().to_string(),
                source: Box::new(e),
            })?;
        debug!(path = %self.file_path.display(), count = file.types.len(), "JSON 目录加载完成");
        Ok(file.types)
    }

    fn name(&self) -> &str {
        "JsonCatalogProvider"
    }
}

#[async_trait]
impl FileCatalogProvider for JsonCatalogProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.file_path).await.unwrap_or(false)
    }
}

/// TOML 目录提供者
#[derive(Debug, Clone)]
pub struct TomlCatalogProvider {
    file_path: PathBuf,
}

impl TomlCatalogProvider {
    /// 创建新的 TOML 目录提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogProvider for TomlCatalogProvider {
    async fn load(&self) -> Result<Vec<TypeDescriptor>, CatalogError> {
        let content = read_catalog(&self.file_path).await?;
        let file: CatalogFile = toml::from_str(&content).map_err(|e| CatalogError::ParseError {
            path: self.file_path.display().to_string(),
            source: Box::new(e),
        })?;
        debug!(path = %self.file_path.display(), count = file.types.len(), "TOML 目录加载完成");
        Ok(file.types)
    }

    fn name(&self) -> &str {
        "TomlCatalogProvider"
    }
}

#[async_trait]
impl FileCatalogProvider for TomlCatalogProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.file_path).await.unwrap_or(false)
    }
}

/// 按扩展名选择目录提供者：`.toml` 用 TOML，其余按 JSON 解析
pub fn provider_for_path<P: AsRef<Path>>(path: P) -> Box<dyn CatalogProvider> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Box::new(TomlCatalogProvider::new(path)),
        _ => Box::new(JsonCatalogProvider::new(path)),
    }
}

async fn read_catalog(path: &Path) -> Result<String, CatalogError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    debug!(path = %path.display(), "读取目录文件");
    Ok(tokio::fs::read_to_string(path).await?)
}
