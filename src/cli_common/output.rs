//! Модуль для форматирования и вывода результатов

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// Формат вывода результатов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Writer для вывода результатов
pub struct OutputWriter {
    writer: Box<dyn Write>,
    format: OutputFormat,
    pretty: bool,
}

impl OutputWriter {
    /// Создает writer для stdout
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(io::stdout()), format)
    }

    pub fn new(writer: Box<dyn Write>, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            pretty: false,
        }
    }

    /// Включает pretty-печать для JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Записывает сериализуемый объект
    pub fn write_object<T: Serialize>(&mut self, obj: &T) -> Result<()> {
        let json = if self.pretty || self.format == OutputFormat::Text {
            serde_json::to_string_pretty(obj)?
        } else {
            serde_json::to_string(obj)?
        };
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// Записывает строку
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    /// Записывает заголовок
    pub fn write_header(&mut self, header: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.writer, "\n{}", header.bold().blue())?;
                writeln!(self.writer, "{}", "=".repeat(header.chars().count()).blue())?;
            }
            OutputFormat::Json => {}
        }
        Ok(())
    }

    /// Записывает таблицу
    pub fn write_table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                // Вычисляем ширину колонок
                let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
                for row in &rows {
                    for (i, cell) in row.iter().enumerate() {
                        if i < widths.len() {
                            widths[i] = widths[i].max(cell.chars().count());
                        }
                    }
                }

                for (i, header) in headers.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " │ ")?;
                    }
                    write!(self.writer, "{:width$}", header.bold(), width = widths[i])?;
                }
                writeln!(self.writer)?;

                for (i, width) in widths.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, "─┼─")?;
                    }
                    write!(self.writer, "{}", "─".repeat(*width))?;
                }
                writeln!(self.writer)?;

                for row in rows {
                    for (i, cell) in row.iter().enumerate() {
                        if i > 0 {
                            write!(self.writer, " │ ")?;
                        }
                        match widths.get(i) {
                            Some(width) => write!(self.writer, "{:width$}", cell, width = *width)?,
                            None => write!(self.writer, "{}", cell)?,
                        }
                    }
                    writeln!(self.writer)?;
                }
            }
            OutputFormat::Json => {
                // Конвертируем в JSON объекты
                let objects: Vec<serde_json::Value> = rows
                    .into_iter()
                    .map(|row| {
                        let obj: serde_json::Map<String, serde_json::Value> = headers
                            .iter()
                            .zip(row)
                            .map(|(h, cell)| (h.to_string(), serde_json::Value::String(cell)))
                            .collect();
                        serde_json::Value::Object(obj)
                    })
                    .collect();
                self.write_object(&objects)?;
            }
        }
        Ok(())
    }

    /// Завершает запись и сбрасывает буфер
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
