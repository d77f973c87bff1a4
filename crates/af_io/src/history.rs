// crates/af_io/src/history.rs

//! 行式数值输出
//!
//! 残差历史（`resnorms`）与质量守恒诊断（`mass_residue`）每行固定
//! 五个数，空格分隔；壁面压力输出每行一对 (x, p)。
//! 行式输出追求简单可靠，每行写出后立即落盘。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::IoResult;

/// 行式数值输出
pub struct LineSink {
    writer: BufWriter<File>,
}

impl LineSink {
    /// 创建（截断已有文件）
    pub fn create(path: &Path) -> IoResult<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }

    /// 写一行数值
    pub fn write_line(&mut self, values: &[f64]) -> IoResult<()> {
        let mut first = true;
        for value in values {
            if !first {
                write!(self.writer, " ")?;
            }
            write!(self.writer, "{value:.12e}")?;
            first = false;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// 写出壁面压力分布
pub fn write_wall_pressure(path: &Path, pressure: &[(f64, f64)]) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (x, p) in pressure {
        writeln!(writer, "{x:.12e} {p:.12e}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_line_sink_five_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resnorms");
        {
            let mut sink = LineSink::create(&path).unwrap();
            sink.write_line(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
            sink.write_line(&[0.5, 0.4, 0.3, 0.2, 0.1]).unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split_whitespace().count(), 5);
        let first: f64 = lines[0].split_whitespace().next().unwrap().parse().unwrap();
        assert_eq!(first, 1.0);
    }

    #[test]
    fn test_wall_pressure_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressure-none");
        write_wall_pressure(&path, &[(0.05, 101325.0), (0.15, 101000.0)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        let mut parts = text.lines().next().unwrap().split_whitespace();
        let x: f64 = parts.next().unwrap().parse().unwrap();
        assert!((x - 0.05).abs() < 1e-15);
    }
}
