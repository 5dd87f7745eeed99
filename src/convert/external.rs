use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::convert::HtmlSource;

/// 外部进程转换器
///
/// 调用外部命令完成 Markdown 到 HTML 的转换:Markdown 整体写入
/// 子进程的标准输入,关闭后再一次读回标准输出的全部 HTML。
/// 不支持边写边读的流式转换器。适合接入 pandoc 这类命令行工具。
pub struct ExternalConverter {
    program: String,
    args: Vec<String>,
}

impl ExternalConverter {
    /// 用程序名创建转换器
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// 追加一个命令行参数
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl HtmlSource for ExternalConverter {
    fn to_html(&self, markdown: &str) -> Result<String> {
        debug!("调用外部转换器: {}", self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("无法启动外部转换器 {}", self.program))?;

        // 写完立即关闭标准输入,子进程才会开始产出;
        // 写入失败时先回收子进程再报错,不留僵尸进程
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(markdown.as_bytes()),
            None => Ok(()),
        };
        if let Err(e) = write_result {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow::Error::new(e).context("写入外部转换器失败"));
        }

        let output = child
            .wait_with_output()
            .context("等待外部转换器退出失败")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "外部转换器 {} 退出异常 ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            ));
        }

        String::from_utf8(output.stdout).context("外部转换器输出不是合法的 UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_error() {
        let converter = ExternalConverter::new("md-preview-no-such-program");
        let result = converter.to_html("hello");
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_passthrough_via_cat() {
        let converter = ExternalConverter::new("cat");
        let html = converter.to_html("<p>raw</p>").unwrap();
        assert_eq!(html, "<p>raw</p>");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_error() {
        let converter = ExternalConverter::new("false");
        let result = converter.to_html("hello");
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_child_exits_without_reading_input() {
        // 子进程不读输入直接退出,大输入在写入侧收到管道错误
        let converter = ExternalConverter::new("sh").arg("-c").arg("exit 0");
        let big = "x".repeat(4 * 1024 * 1024);
        let result = converter.to_html(&big);
        assert!(result.is_err());
    }
}
