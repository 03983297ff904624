//! Narrative TUI
//!
//! 使用 crossterm 和 ratatui 构建的写作建议审阅界面，状态全部由 `narrative-core` 的
//! `EditorSurface` 持有，分析/润色请求通过 `narrative-analysis` 的 HTTP 客户端发出。
//!
//! # 用法
//!
//! ```bash
//! cargo run -p narrative-tui -- draft.txt
//! cargo run -p narrative-tui -- --api-url http://localhost:8001/api draft.txt
//!
//! # 批处理模式：打印两份文本的并排 diff 后退出
//! cargo run -p narrative-tui -- draft.txt --compare revised.txt
//! ```
//!
//! 日志写入 `--log-file` 指定的文件，级别由 `NARRATIVE_TUI_LOG_LEVEL` 控制。
//!
//! # 快捷键
//!
//! - 1/2/3: 编辑 / 预览 / Diff 视图
//! - F5 / Ctrl+D: 切换 diff 覆盖
//! - Left/Right: 在建议之间移动（以下建议按键仅在编辑视图生效）
//! - Enter / a: 接受当前建议
//! - r / Backspace: 拒绝当前建议
//! - Esc: 关闭建议详情
//! - F2: 分析, F3: 润色
//! - s / i: 切换写作风格 / 润色强度
//! - e: 进入输入模式（Esc 退出）
//! - Up/Down/PageUp/PageDown: 滚动
//! - Ctrl+S: 保存, Ctrl+R: 重置, q / Ctrl+X: 退出

mod cli;

use cli::CommandLineArgs;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use narrative_analysis::HttpAnalysisClient;
use narrative_core::{
    EditorSurface, EnhanceOptions, OverlayMark, SpanCategory, ViewMode, diff, format_side_by_side,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{
    fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, filter::Directive, fmt::time::ChronoLocal};

const LOG_LEVEL_ENV: &str = "NARRATIVE_TUI_LOG_LEVEL";

const SIDE_PANEL_WIDTH: u16 = 38;

const SAMPLE_TEXT: &str = "The rain had stopped by the time Mei reached the harbor. She walks along the pier, counting the boats that had come back before dark. Her brother was supposed to be on the last one.

Tomas was waiting by the harbor office with two cups of tea. He was nervous about the news, but he tried to hide it behind a joke about the weather. They stood together and watched the water.

When the last boat finally appeared, Mei dropped her cup. He was nervous too, though he would never admit it. The crew waved from the deck, and everyone on the pier cheered.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendRequest {
    Analyze,
    Enhance,
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    is_error: bool,
}

/// 应用状态
struct App {
    /// 文档 + 建议 + 视图状态
    surface: EditorSurface,
    /// 分析服务客户端
    backend: HttpAnalysisClient,
    /// 文件路径（使用内置示例文本时为 None）
    file_path: Option<PathBuf>,
    /// 打开时的文本（Ctrl+R 重置到这里）
    initial_text: String,
    /// 最近一次保存的文本
    saved_text: String,
    /// 润色参数
    options: EnhanceOptions,
    input_mode: InputMode,
    /// 输入模式下的光标（字符偏移）
    cursor: usize,
    scroll_top: usize,
    /// 主区域可见行数（渲染时更新）
    viewport_height: usize,
    /// 状态行提示，下一次按键时清除
    notice: Option<Notice>,
    /// 下一帧绘制完成后执行的请求
    pending: Option<BackendRequest>,
    should_quit: bool,
    /// 确认退出模式（如果有未保存修改）
    confirm_quit: bool,
}

impl App {
    /// 创建新的应用实例
    fn new(
        file_path: Option<PathBuf>,
        backend: HttpAnalysisClient,
        options: EnhanceOptions,
    ) -> io::Result<Self> {
        let content = match &file_path {
            Some(path) if path.exists() => fs::read_to_string(path)?,
            Some(_) => String::new(),
            None => SAMPLE_TEXT.to_string(),
        };

        let mut surface = EditorSurface::new(content.as_str());

        // 订阅状态变更
        surface.subscribe(|change| {
            tracing::trace!(
                kind = ?change.kind,
                version = change.new_version,
                span = ?change.span_index,
                "surface changed"
            );
        });

        Ok(Self {
            surface,
            backend,
            file_path,
            saved_text: content.clone(),
            initial_text: content,
            options,
            input_mode: InputMode::Normal,
            cursor: 0,
            scroll_top: 0,
            viewport_height: 0,
            notice: None,
            pending: None,
            should_quit: false,
            confirm_quit: false,
        })
    }

    fn is_modified(&self) -> bool {
        self.file_path.is_some() && self.surface.text() != self.saved_text
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: true,
        });
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // 确认退出模式
        if self.confirm_quit {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Err(e) = self.save_file() {
                        self.error(format!("Save failed: {e}"));
                        self.confirm_quit = false;
                    } else {
                        self.should_quit = true;
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.confirm_quit = false;
                    self.notice = None;
                }
                _ => {}
            }
            return;
        }

        // 错误提示吞掉这次按键
        if let Some(notice) = self.notice.take()
            && notice.is_error
        {
            return;
        }

        if self.input_mode == InputMode::Insert {
            self.handle_insert_key(key);
            return;
        }

        // 建议相关按键只在显示建议栏的编辑视图中生效
        let reviewing = self.surface.shows_suggestion_bar();

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.save_with_notice(),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => self.request_quit(),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.reset(),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::F(5)) => {
                self.surface.toggle_show_diff();
                self.scroll_top = 0;
            }
            (_, KeyCode::F(2)) => {
                self.pending = Some(BackendRequest::Analyze);
                self.info("Analyzing...");
            }
            (_, KeyCode::F(3)) => {
                self.pending = Some(BackendRequest::Enhance);
                self.info(format!(
                    "Enhancing ({}, {})...",
                    self.options.style, self.options.intensity
                ));
            }
            (_, KeyCode::Char('q')) => self.request_quit(),
            (_, KeyCode::Char('1')) => self.set_view(ViewMode::Edit),
            (_, KeyCode::Char('2')) => self.set_view(ViewMode::Preview),
            (_, KeyCode::Char('3')) => self.set_view(ViewMode::Diff),
            (_, KeyCode::Char('e')) => self.enter_insert_mode(),
            (_, KeyCode::Char('s')) => {
                self.options.style = self.options.style.next();
                self.info(format!("Writing style: {}", self.options.style));
            }
            (_, KeyCode::Char('i')) => {
                self.options.intensity = self.options.intensity.next();
                self.info(format!("Enhancement intensity: {}", self.options.intensity));
            }
            (_, KeyCode::Left) if reviewing => self.move_selection(false),
            (_, KeyCode::Right) if reviewing => self.move_selection(true),
            (_, KeyCode::Enter) | (_, KeyCode::Char('a')) if reviewing => self.accept_selected(),
            (_, KeyCode::Backspace) | (_, KeyCode::Char('r')) if reviewing => {
                self.surface.reject_selected();
            }
            (_, KeyCode::Esc) if reviewing => self.surface.clear_selection(),
            (_, KeyCode::Up) => self.scroll_by(-1),
            (_, KeyCode::Down) => self.scroll_by(1),
            (_, KeyCode::PageUp) => self.scroll_by(-(self.viewport_height.max(1) as isize)),
            (_, KeyCode::PageDown) => self.scroll_by(self.viewport_height.max(1) as isize),
            _ => {}
        }
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.input_mode = InputMode::Normal;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.save_with_notice(),
            (KeyModifiers::CONTROL, _) => {}
            (_, KeyCode::Char(c)) => self.insert_text(&c.to_string()),
            (_, KeyCode::Enter) => self.insert_text("\n"),
            (_, KeyCode::Tab) => self.insert_text("    "),
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (_, KeyCode::Left) => self.cursor = self.cursor.saturating_sub(1),
            (_, KeyCode::Right) => {
                self.cursor = (self.cursor + 1).min(self.surface.text().chars().count());
            }
            (_, KeyCode::Up) => self.move_cursor_vertically(-1),
            (_, KeyCode::Down) => self.move_cursor_vertically(1),
            (_, KeyCode::Home) => {
                let (line, _) = line_col_at(self.surface.text(), self.cursor);
                self.cursor = offset_at(self.surface.text(), line, 0);
            }
            (_, KeyCode::End) => {
                let (line, _) = line_col_at(self.surface.text(), self.cursor);
                self.cursor = offset_at(self.surface.text(), line, usize::MAX);
            }
            _ => {}
        }
        self.adjust_scroll();
    }

    fn handle_paste(&mut self, text: String) {
        if self.input_mode == InputMode::Insert {
            self.insert_text(&text);
            self.adjust_scroll();
        }
    }

    fn set_view(&mut self, mode: ViewMode) {
        self.surface.set_view(mode);
        if self.surface.view().show_diff() && mode != ViewMode::Diff {
            self.info(format!(
                "{} view selected; press F5 to leave the diff",
                mode.as_str()
            ));
        }
        self.scroll_top = 0;
    }

    fn enter_insert_mode(&mut self) {
        if self.surface.current_view() != ViewMode::Edit {
            self.error("Switch to the edit view (1) to type");
            return;
        }
        self.surface.clear_selection();
        self.cursor = self.cursor.min(self.surface.text().chars().count());
        self.input_mode = InputMode::Insert;
        self.adjust_scroll();
    }

    /// 在仍然有效的建议之间循环移动
    fn move_selection(&mut self, forward: bool) {
        let active: Vec<usize> = self.surface.active_spans().map(|(index, _)| index).collect();
        if active.is_empty() {
            return;
        }

        let next = match self.surface.spans().selected() {
            None if forward => active[0],
            None => active[active.len() - 1],
            Some(current) => {
                let pos = active.iter().position(|i| *i == current).unwrap_or(0);
                if forward {
                    active[(pos + 1) % active.len()]
                } else {
                    active[(pos + active.len() - 1) % active.len()]
                }
            }
        };

        if self.surface.spans().selected() != Some(next) {
            self.surface.select_span(next);
            self.scroll_to_selected();
        }
    }

    fn scroll_to_selected(&mut self) {
        let Some(index) = self.surface.spans().selected() else {
            return;
        };
        let Some(mark) = self
            .surface
            .overlays()
            .into_iter()
            .find(|mark| mark.index == index)
        else {
            return;
        };
        let (line, _) = line_col_at(self.surface.text(), mark.range.start);
        self.keep_line_visible(line);
    }

    fn accept_selected(&mut self) {
        let Some((_, span)) = self.surface.spans().selected_span() else {
            return;
        };
        let is_noop = span.original_text == span.suggestion_text;
        let before = self.surface.text().to_string();

        if self.surface.accept_selected() && !is_noop && self.surface.text() == before {
            self.info("Suggested text no longer present; suggestion dismissed");
        }
    }

    fn request_quit(&mut self) {
        if self.is_modified() {
            self.confirm_quit = true;
            self.info("File modified. Save before quitting? (y/n)");
        } else {
            self.should_quit = true;
        }
    }

    fn reset(&mut self) {
        self.surface.reset(self.initial_text.as_str());
        self.cursor = 0;
        self.scroll_top = 0;
        self.info("Document reset");
    }

    /// 在下一帧绘制之后执行后端请求（阻塞）
    fn run_pending(&mut self) {
        let Some(request) = self.pending.take() else {
            return;
        };

        match request {
            BackendRequest::Analyze => match self.surface.run_analysis(&mut self.backend) {
                Ok(()) => {
                    let count = self.surface.spans().len();
                    self.scroll_top = 0;
                    self.info(format!("Analysis complete: {count} suggestions"));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "analysis failed");
                    self.error(err.to_string());
                }
            },
            BackendRequest::Enhance => {
                match self.surface.run_enhancement(&mut self.backend, self.options) {
                    Ok(()) => {
                        let changed = self.surface.diff().changed_count();
                        self.scroll_top = 0;
                        self.info(format!("Enhancement ready: {changed} lines changed"));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "enhancement failed");
                        self.error(err.to_string());
                    }
                }
            }
        }
    }

    // ---- 编辑 ---------------------------------------------------------------------------

    fn insert_text(&mut self, inserted: &str) {
        let mut text = self.surface.text().to_string();
        let cursor = self.cursor.min(text.chars().count());
        text.insert_str(byte_offset(&text, cursor), inserted);
        self.cursor = cursor + inserted.chars().count();
        self.surface.set_text(text);
    }

    fn backspace(&mut self) {
        let cursor = self.cursor.min(self.surface.text().chars().count());
        if cursor == 0 {
            return;
        }
        self.remove_char_at(cursor - 1);
        self.cursor = cursor - 1;
    }

    fn delete(&mut self) {
        let cursor = self.cursor.min(self.surface.text().chars().count());
        if cursor < self.surface.text().chars().count() {
            self.remove_char_at(cursor);
        }
    }

    fn remove_char_at(&mut self, offset: usize) {
        let mut text = self.surface.text().to_string();
        let start = byte_offset(&text, offset);
        let end = byte_offset(&text, offset + 1);
        text.replace_range(start..end, "");
        self.surface.set_text(text);
    }

    fn move_cursor_vertically(&mut self, delta: isize) {
        let text = self.surface.text();
        let (line, col) = line_col_at(text, self.cursor);
        let target = line.saturating_add_signed(delta);
        if delta < 0 && line == 0 {
            return;
        }
        self.cursor = offset_at(text, target, col);
    }

    // ---- 滚动 ---------------------------------------------------------------------------

    fn content_line_count(&self) -> usize {
        match self.surface.current_view() {
            ViewMode::Diff => self.surface.diff().len(),
            ViewMode::Edit | ViewMode::Preview => self.surface.stats().line_count,
        }
    }

    fn max_scroll_top(&self) -> usize {
        self.content_line_count()
            .saturating_sub(self.viewport_height.max(1))
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll_top = self
            .scroll_top
            .saturating_add_signed(delta)
            .min(self.max_scroll_top());
    }

    fn keep_line_visible(&mut self, line: usize) {
        let height = self.viewport_height.max(1);
        if line < self.scroll_top {
            self.scroll_top = line;
        } else if line >= self.scroll_top + height {
            self.scroll_top = line + 1 - height;
        }
    }

    fn adjust_scroll(&mut self) {
        let (line, _) = line_col_at(self.surface.text(), self.cursor);
        self.keep_line_visible(line);
    }

    // ---- 文件 ---------------------------------------------------------------------------

    /// 保存文件
    fn save_file(&mut self) -> io::Result<()> {
        let Some(path) = &self.file_path else {
            return Err(io::Error::other(
                "no file to save to (started from the sample text)",
            ));
        };
        fs::write(path, self.surface.text())?;
        tracing::info!(path = %path.display(), "saved document");
        self.saved_text = self.surface.text().to_string();
        Ok(())
    }

    fn save_with_notice(&mut self) {
        match self.save_file() {
            Ok(()) => {
                let path = self
                    .file_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.info(format!("Saved: {path}"));
            }
            Err(e) => self.error(format!("Save failed: {e}")),
        }
    }

    // ---- 渲染 ---------------------------------------------------------------------------

    /// 渲染 UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let bar_height = if self.surface.shows_suggestion_bar() {
            if self.surface.spans().selected().is_some() {
                5
            } else {
                1
            }
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),          // 工具栏
                Constraint::Length(bar_height), // 建议栏 + 详情
                Constraint::Min(1),             // 主区域
                Constraint::Length(1),          // 状态行
                Constraint::Length(1),          // 快捷键提示
            ])
            .split(size);

        let body = if self.surface.is_analyzed() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(1), Constraint::Length(SIDE_PANEL_WIDTH)])
                .split(chunks[2]);
            self.render_side_panel(frame, columns[1]);
            columns[0]
        } else {
            chunks[2]
        };

        // 视口信息（主区域内侧，不包含边框）
        self.viewport_height = body.height.saturating_sub(2) as usize;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());

        self.render_toolbar(frame, chunks[0]);
        if bar_height > 0 {
            self.render_suggestion_bar(frame, chunks[1]);
        }
        match self.surface.current_view() {
            ViewMode::Edit => self.render_edit(frame, body),
            ViewMode::Preview => self.render_preview(frame, body),
            ViewMode::Diff => self.render_diff(frame, body),
        }
        self.render_status_line(frame, chunks[3]);
        self.render_shortcuts(frame, chunks[4]);
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect) {
        let current = self.surface.current_view();
        let mut spans = Vec::new();

        for (n, mode) in ViewMode::ALL.into_iter().enumerate() {
            let label = format!(" {} {} ", n + 1, mode.as_str());
            let style = if mode == current {
                Style::default()
                    .bg(Color::White)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
        }

        let counts = self.surface.category_counts();
        for (category, count) in counts.non_zero() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!(" {} {count} ", category.label()),
                Style::default().bg(category_color(category)).fg(Color::Black),
            ));
        }

        let stats = self.surface.stats();
        spans.push(Span::styled(
            format!(
                "  {} words · {} chars · {} min read · {} / {}",
                stats.word_count,
                stats.grapheme_count,
                stats.reading_minutes,
                self.options.style,
                self.options.intensity
            ),
            Style::default().fg(Color::Gray),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_suggestion_bar(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let selected = self.surface.spans().selected();
        let mut chips = vec![Span::styled(
            "Suggestions: ",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for (index, span) in self.surface.active_spans() {
            let mut style = Style::default().fg(category_color(span.category));
            if selected == Some(index) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            chips.push(Span::styled(
                format!("[{} {}]", index + 1, span.category.as_str()),
                style,
            ));
            chips.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(chips)), rows[0]);

        let Some((index, span)) = self.surface.spans().selected_span() else {
            return;
        };
        let replacement = if span.is_deletion() {
            Span::styled("(delete)", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(span.suggestion_text.clone(), Style::default().fg(Color::Green))
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("#{} {}", index + 1, span.category.label()),
                    Style::default()
                        .fg(category_color(span.category))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::raw(span.rationale.clone()),
            ]),
            Line::from(vec![
                Span::styled("  - ", Style::default().fg(Color::Red)),
                Span::styled(span.original_text.clone(), Style::default().fg(Color::Red)),
            ]),
            Line::from(vec![
                Span::styled("  + ", Style::default().fg(Color::Green)),
                replacement,
            ]),
        ];
        let detail = Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(detail, rows[1]);
    }

    fn main_block(&self, title: &str) -> Block<'static> {
        let name = self
            .file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());
        let modified = if self.is_modified() { " *" } else { "" };
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {name}{modified} · {title} "))
    }

    fn render_edit(&self, frame: &mut Frame, area: Rect) {
        let text = self.surface.text();
        let marks = self.surface.overlays();
        let selected = self.surface.spans().selected();
        let height = area.height.saturating_sub(2) as usize;

        let lines: Vec<Line> = line_starts(text)
            .into_iter()
            .skip(self.scroll_top)
            .take(height)
            .map(|(start, line)| styled_line(line, start, &marks, selected))
            .collect();

        let title = if self.input_mode == InputMode::Insert {
            "edit · INSERT"
        } else {
            "edit"
        };
        frame.render_widget(Paragraph::new(lines).block(self.main_block(title)), area);

        if self.input_mode == InputMode::Insert {
            let cursor = self.cursor.min(text.chars().count());
            let (line, col) = line_col_at(text, cursor);
            if line >= self.scroll_top && line < self.scroll_top + height {
                let line_text = text.split('\n').nth(line).unwrap_or("");
                let prefix: String = line_text.chars().take(col).collect();
                let x = Line::raw(prefix).width() as u16;
                let inner_right = area.x + area.width.saturating_sub(2);
                frame.set_cursor_position((
                    (area.x + 1 + x).min(inner_right),
                    area.y + 1 + (line - self.scroll_top) as u16,
                ));
            }
        }
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let preview = Paragraph::new(self.surface.text().replace('\r', ""))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_top.min(u16::MAX as usize) as u16, 0))
            .block(self.main_block("preview"));
        frame.render_widget(preview, area);
    }

    fn render_diff(&self, frame: &mut Frame, area: Rect) {
        let view = self.surface.diff();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let height = area.height.saturating_sub(2) as usize;

        let visible = view.rows.iter().skip(self.scroll_top).take(height);
        let (original, enhanced): (Vec<Line>, Vec<Line>) = visible
            .map(|row| {
                if row.changed {
                    (
                        Line::styled(
                            row.original_display().to_string(),
                            Style::default().bg(Color::Rgb(70, 20, 20)),
                        ),
                        Line::styled(
                            row.candidate_display().to_string(),
                            Style::default().bg(Color::Rgb(20, 60, 20)),
                        ),
                    )
                } else {
                    (
                        Line::raw(row.original_display().to_string()),
                        Line::raw(row.candidate_display().to_string()),
                    )
                }
            })
            .unzip();

        let enhanced_title = if self.surface.enhancement().is_some() {
            format!(" Enhanced · {} changed ", view.changed_count())
        } else {
            " Enhanced · none yet (F3) ".to_string()
        };

        frame.render_widget(
            Paragraph::new(original)
                .block(Block::default().borders(Borders::ALL).title(" Original ")),
            columns[0],
        );
        frame.render_widget(
            Paragraph::new(enhanced)
                .block(Block::default().borders(Borders::ALL).title(enhanced_title)),
            columns[1],
        );
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        if let Some(score) = self.surface.overall_score() {
            lines.push(Line::from(vec![
                Span::raw("Score: "),
                Span::styled(
                    format!("{score}/100"),
                    Style::default().fg(score_color(score)).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        if let Some(consistent) = self.surface.tense_consistent() {
            lines.push(Line::raw(format!(
                "Tense: {}",
                if consistent { "consistent" } else { "mixed" }
            )));
        }
        if let Some(readability) = self.surface.readability_score() {
            lines.push(Line::raw(format!("Readability: {readability:.1}")));
        }

        let spans = self.surface.spans();
        if !spans.is_empty() {
            lines.push(Line::raw(format!(
                "Reviewed: {}/{}",
                spans.resolved_count(),
                spans.len()
            )));
        }

        if let Some(enhancement) = self.surface.enhancement() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("Edit log ({})", enhancement.edit_log.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for entry in &enhancement.edit_log {
                lines.push(Line::styled(
                    entry.operation.clone(),
                    Style::default().fg(Color::Cyan),
                ));
                if !entry.original.is_empty() {
                    lines.push(Line::styled(
                        format!(" - {}", entry.original),
                        Style::default().fg(Color::Red),
                    ));
                }
                if !entry.modified.is_empty() {
                    lines.push(Line::styled(
                        format!(" + {}", entry.modified),
                        Style::default().fg(Color::Green),
                    ));
                }
                if !entry.reason.is_empty() {
                    lines.push(Line::styled(
                        format!("   {}", entry.reason),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
        }

        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Analysis "));
        frame.render_widget(panel, area);
    }

    /// 渲染状态行
    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let (text, bg) = match &self.notice {
            Some(notice) if notice.is_error => (format!("{}  (any key)", notice.text), Color::Red),
            Some(notice) => (notice.text.clone(), Color::DarkGray),
            None => {
                let spans = self.surface.spans();
                let mode = match self.input_mode {
                    InputMode::Normal => "NORMAL",
                    InputMode::Insert => "INSERT",
                };
                (
                    format!(
                        "{} | {} active / {} suggestions | v{}",
                        mode,
                        spans.active_count(),
                        spans.len(),
                        self.surface.version()
                    ),
                    Color::DarkGray,
                )
            }
        };

        let status_line = Paragraph::new(text).style(
            Style::default()
                .bg(bg)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    /// 渲染快捷键提示
    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = if self.confirm_quit {
            "Y:save and quit  N:quit without saving  Esc:cancel"
        } else if self.input_mode == InputMode::Insert {
            "Esc:done  Ctrl-S:save  arrows/Home/End:move"
        } else {
            "1/2/3:view  F5:diff  ←/→:suggestion  Enter/a:accept  r:reject  F2:analyze  F3:enhance  s/i:style/intensity  e:type  Ctrl-S:save  Ctrl-R:reset  q:quit"
        };

        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn category_color(category: SpanCategory) -> Color {
    match category {
        SpanCategory::Grammar => Color::LightRed,
        SpanCategory::Clarity => Color::Yellow,
        SpanCategory::Style => Color::LightBlue,
        SpanCategory::Consistency => Color::LightMagenta,
    }
}

fn score_color(score: u8) -> Color {
    match score {
        80..=100 => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Byte index of char offset `offset` (clamped to the end).
fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// `(start char offset, line text)` for every line, `\r` stripped.
fn line_starts(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        out.push((start, line.strip_suffix('\r').unwrap_or(line)));
        start += line.chars().count() + 1;
    }
    out
}

/// Zero-based `(line, column)` of a char offset.
fn line_col_at(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for ch in text.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Char offset of `(line, column)`, clamping both to the text.
fn offset_at(text: &str, line: usize, col: usize) -> usize {
    let starts = line_starts(text);
    let Some((start, line_text)) = starts.get(line.min(starts.len().saturating_sub(1))) else {
        return 0;
    };
    start + col.min(line_text.chars().count())
}

/// Split one buffer line into plain and highlighted runs.
fn styled_line(
    line: &str,
    line_start: usize,
    marks: &[OverlayMark],
    selected: Option<usize>,
) -> Line<'static> {
    let chars: Vec<char> = line.chars().collect();
    let line_end = line_start + chars.len();
    let slice = |from: usize, to: usize| -> String {
        chars[from - line_start..to - line_start].iter().collect()
    };

    let mut spans = Vec::new();
    let mut pos = line_start;
    for mark in marks {
        let start = mark.range.start.max(pos);
        let end = mark.range.end.min(line_end);
        if start >= end {
            continue;
        }
        if start > pos {
            spans.push(Span::raw(slice(pos, start)));
        }
        let mut style = Style::default()
            .fg(category_color(mark.category))
            .add_modifier(Modifier::UNDERLINED);
        if selected == Some(mark.index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(slice(start, end), style));
        pos = end;
    }
    if pos < line_end {
        spans.push(Span::raw(slice(pos, line_end)));
    }
    Line::from(spans)
}

fn init_tracing_subscriber(path: &Path) -> io::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let mut filter = EnvFilter::from_env(LOG_LEVEL_ENV);
    for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn", "rustls=warn"] {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
    Ok(())
}

fn print_comparison(
    original: Option<&PathBuf>,
    revised: &Path,
    column_width: usize,
) -> io::Result<()> {
    let original = original.ok_or_else(|| io::Error::other("--compare needs FILE"))?;
    let original = fs::read_to_string(original)?;
    let revised = fs::read_to_string(revised)?;

    let view = diff::render(&original, &revised);
    tracing::info!(rows = view.len(), changed = view.changed_count(), "comparison rendered");
    print!("{}", format_side_by_side(&view, column_width));
    println!("{} of {} lines changed", view.changed_count(), view.len());
    Ok(())
}

fn main() -> io::Result<()> {
    let args = CommandLineArgs::parse();

    if let Some(path) = args.log_file() {
        init_tracing_subscriber(path)?;
    }

    if let Some(revised) = args.compare() {
        return print_comparison(args.file(), revised, args.column_width());
    }

    let backend = HttpAnalysisClient::new(args.client_config()).map_err(io::Error::other)?;
    let mut app = App::new(args.file().cloned(), backend, args.enhance_options())?;
    tracing::info!(
        file = ?args.file(),
        api = %args.client_config().base_url,
        "starting"
    );

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        // 先把 "Analyzing..." 画出来，再发阻塞请求
        if app.pending.is_some() {
            app.run_pending();
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                _ => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_analysis::ClientConfig;
    use narrative_core::{AnalysisReport, Span as Suggestion, SpanRange};

    fn reviewing_app() -> App {
        let backend = HttpAnalysisClient::new(ClientConfig::default()).unwrap();
        let mut app = App::new(None, backend, EnhanceOptions::default()).unwrap();
        app.surface.reset("Arjun was nervous.");
        app.surface.apply_analysis(AnalysisReport {
            overall_score: 80,
            spans: vec![Suggestion::new(
                SpanRange::new(10, 17),
                SpanCategory::Consistency,
                "nervous",
                "anxious",
                "Vocabulary",
            )],
            tense_consistent: None,
            readability_score: None,
        });
        app.surface.select_span(0);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_suggestion_keys_ignored_outside_edit_view() {
        let mut app = reviewing_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.surface.current_view(), ViewMode::Diff);

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.surface.text(), "Arjun was nervous.");
        assert!(!app.surface.spans().is_resolved(0));
        assert_eq!(app.surface.spans().selected(), Some(0));
    }

    #[test]
    fn test_toolbar_shows_character_count() {
        let app = reviewing_app();
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(160, 1)).unwrap();
        terminal
            .draw(|frame| app.render_toolbar(frame, frame.area()))
            .unwrap();
        let row: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(row.contains("3 words · 18 chars"), "{row}");
    }

    #[test]
    fn test_accept_key_applies_suggestion_in_edit_view() {
        let mut app = reviewing_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.surface.text(), "Arjun was anxious.");
        assert!(app.surface.spans().is_resolved(0));
    }

    #[test]
    fn test_line_col_round_trip() {
        let text = "ab\ncdé\n\nf";
        assert_eq!(line_col_at(text, 0), (0, 0));
        assert_eq!(line_col_at(text, 5), (1, 2));
        assert_eq!(line_col_at(text, 7), (2, 0));
        assert_eq!(offset_at(text, 1, 2), 5);
        // Column and line clamp to the text.
        assert_eq!(offset_at(text, 0, 99), 2);
        assert_eq!(offset_at(text, 99, 0), 8);
    }

    #[test]
    fn test_line_starts_strip_carriage_return() {
        let starts = line_starts("one\r\ntwo");
        assert_eq!(starts, vec![(0, "one"), (5, "two")]);
    }

    #[test]
    fn test_byte_offset_multibyte() {
        assert_eq!(byte_offset("héllo", 2), 3);
        assert_eq!(byte_offset("héllo", 99), 6);
    }

    #[test]
    fn test_styled_line_clips_marks_to_line() {
        let marks = vec![
            OverlayMark {
                index: 0,
                category: SpanCategory::Grammar,
                range: SpanRange::new(2, 8),
            },
            OverlayMark {
                index: 1,
                category: SpanCategory::Style,
                range: SpanRange::new(12, 14),
            },
        ];
        // Second line "world" starts at char 6.
        let line = styled_line("world", 6, &marks, Some(0));
        let parts: Vec<String> = line.spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(parts, vec!["wo", "rld"]);
        assert!(line.spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }
}
