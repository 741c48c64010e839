//! 持久化协作方 - SQLite 数据库
//!
//! rusqlite 的 Connection 不是 Send + Sync，因此把它放到专用工作
//! 线程上，异步侧通过 `execute` 把闭包发过去执行并等待回执。
//! 每个案件的写入在一个事务里完成：要么全部可见，要么全部回滚。

pub mod case_store;

use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use rusqlite::Connection;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, PersistenceError};

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if self.sender.send(DbCommand::Shutdown).is_err() {
                error!("无法向数据库线程发送关闭命令");
            }
            if handle.join().is_err() {
                error!("等待数据库线程退出失败");
            }
        }
    }
}

/// 数据库句柄
///
/// Clone 开销很小（内部 Arc），所有克隆共享同一个工作线程。
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// 打开数据库并初始化表结构
    pub fn new(db_path: impl AsRef<Path>) -> AppResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let path_display = db_path.display().to_string();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Persistence(PersistenceError::OpenFailed {
                        path: path_display.clone(),
                        source: Box::new(e),
                    })
                })?;
            }
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), rusqlite::Error>>();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("ec-capture-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("启用 WAL 模式失败: {}", err);
                }
                if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
                    error!("启用外键约束失败: {}", err);
                }

                if ready_tx.send(init_schema(&conn)).is_err() {
                    error!("数据库初始化回执接收方已退出");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => task(&mut conn),
                        DbCommand::Shutdown => break,
                    }
                }

                debug!("数据库线程退出");
            })
            .map_err(|e| {
                AppError::Persistence(PersistenceError::OpenFailed {
                    path: path_display.clone(),
                    source: Box::new(e),
                })
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                return Err(AppError::Persistence(PersistenceError::OpenFailed {
                    path: path_display,
                    source: Box::new(err),
                }));
            }
            Err(_) => {
                return Err(AppError::Persistence(PersistenceError::WorkerGone));
            }
        }

        info!("✓ 数据库已就绪: {}", path_display);

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// 在数据库线程上执行闭包并等待结果
    pub async fn execute<F, T>(&self, task: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("调用方在收到数据库结果前已退出");
            }
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|_| AppError::Persistence(PersistenceError::WorkerGone))?;

        reply_rx
            .await
            .map_err(|_| AppError::Persistence(PersistenceError::WorkerGone))?
    }
}

fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS property_cases (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       TEXT NOT NULL,
            district      TEXT,
            sro           TEXT,
            search_params TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS ec_entries (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            case_id       INTEGER NOT NULL REFERENCES property_cases(id) ON DELETE CASCADE,
            doc_number    TEXT,
            reg_date      TEXT,
            nature_of_doc TEXT,
            parties       TEXT,
            consideration REAL NOT NULL DEFAULT 0,
            schedule_text TEXT
        );
        CREATE TABLE IF NOT EXISTS boundary_versions (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            ec_entry_id           INTEGER NOT NULL REFERENCES ec_entries(id) ON DELETE CASCADE,
            north_text            TEXT NOT NULL,
            south_text            TEXT NOT NULL,
            east_text             TEXT NOT NULL,
            west_text             TEXT NOT NULL,
            extraction_confidence REAL NOT NULL
        );",
    )
}
