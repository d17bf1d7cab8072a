use crate::charts::MotionChart;
use crate::config::Config;
use crate::export::{export_recording, ExportRequest};
use crate::hub::SensorHub;
use crate::render::{self, ChartFrame, RenderUpdate, UPDATE_FREQ_MS};
use crate::server::ServerEvent;
use crate::ui::styles;
use iced::widget::{button, column, container, radio, row, text, text_input, Row};
use iced::{Element, Length, Subscription, Task};
use plotters_iced::ChartWidget;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Assessment the recording belongs to; becomes part of the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Basmi,
    MBasmi,
    Aspi,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Basmi, Category::MBasmi, Category::Aspi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basmi => "BASMI",
            Category::MBasmi => "mBASMI",
            Category::Aspi => "ASPI",
        }
    }
}

// Iced Application State
pub struct MotionRecorder {
    hub: SensorHub,
    output_dir: PathBuf,
    server_events: Receiver<ServerEvent>,
    server_status: String,
    participant: String,
    category: Category,
    submitted: String,
    export_status: String,
    phone_frame: ChartFrame,
    wrist_frame: ChartFrame,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    ParticipantChanged(String),
    CategorySelected(Category),
    Submit,
    ToggleRecording,
    SaveRecording,
}

impl MotionRecorder {
    pub fn new(
        hub: SensorHub,
        config: &Config,
        server_events: Receiver<ServerEvent>,
    ) -> (Self, Task<Message>) {
        (
            MotionRecorder {
                hub,
                output_dir: config.output_dir.clone(),
                server_events,
                server_status: format!("Starting server on {}...", config.listen_addr()),
                participant: String::new(),
                category: Category::default(),
                submitted: String::new(),
                export_status: String::new(),
                phone_frame: ChartFrame::default(),
                wrist_frame: ChartFrame::default(),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.drain_server_events();
                if let RenderUpdate::Frames { phone, wrist } = render::refresh(&self.hub) {
                    self.phone_frame = phone;
                    self.wrist_frame = wrist;
                }
            }
            Message::ParticipantChanged(value) => {
                self.participant = value;
            }
            Message::CategorySelected(category) => {
                self.category = category;
            }
            Message::Submit => {
                self.submitted = format!("You have entered: {}", self.participant);
            }
            Message::ToggleRecording => {
                self.hub.recording.toggle();
            }
            Message::SaveRecording => {
                let request = ExportRequest {
                    participant: &self.participant,
                    category: self.category.as_str(),
                };
                self.export_status = export_recording(
                    &self.hub.store,
                    self.hub.recording.status(),
                    &request,
                    &self.output_dir,
                );
            }
        }
        Task::none()
    }

    // Process all pending server notifications without blocking
    fn drain_server_events(&mut self) {
        while let Ok(event) = self.server_events.try_recv() {
            self.server_status = match event {
                ServerEvent::Listening(addr) => format!("Receiving sensor data on http://{}/data", addr),
                ServerEvent::Error(e) => e,
            };
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_millis(UPDATE_FREQ_MS)).map(|_| Message::Tick)
    }

    pub fn view(&'_ self) -> Element<'_, Message> {
        let content = row![self.create_sidebar(), self.create_charts()].spacing(20);

        container(content)
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn create_sidebar(&self) -> Element<'_, Message> {
        let categories = Row::with_children(Category::ALL.iter().map(|&category| {
            radio(
                category.as_str(),
                category,
                Some(self.category),
                Message::CategorySelected,
            )
            .into()
        }))
        .spacing(15);

        let participant = text_input("Participant number", &self.participant)
            .on_input(Message::ParticipantChanged)
            .on_submit(Message::Submit)
            .padding(8);

        let recording = self.hub.recording.is_active();
        let record_button = button(text(self.hub.recording.label()))
            .on_press(Message::ToggleRecording)
            .padding(10)
            .width(Length::Fill)
            .style(styles::record_button_style(recording));
        let save_button = button(text("Save Recording"))
            .on_press(Message::SaveRecording)
            .padding(10)
            .width(Length::Fill)
            .style(styles::save_button_style(recording));

        let sidebar_content = column![
            text("Wear-axSpA Data Recorder").size(22),
            text("Participant Number:"),
            participant,
            text("Select an option:"),
            categories,
            button(text("Submit")).on_press(Message::Submit).padding(10),
            text(self.submitted.as_str()),
            record_button,
            save_button,
            text(self.export_status.as_str()),
            text(self.server_status.as_str()).size(12),
        ]
        .spacing(10)
        .width(300);

        container(sidebar_content)
            .style(container::bordered_box)
            .padding(10)
            .width(Length::Fixed(320.0))
            .height(Length::Fill)
            .into()
    }

    fn create_charts(&self) -> Element<'_, Message> {
        let phone_chart = ChartWidget::new(MotionChart {
            frame: &self.phone_frame,
            caption: "Phone data",
            y_desc: "Acceleration m/s²",
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let wrist_chart = ChartWidget::new(MotionChart {
            frame: &self.wrist_frame,
            caption: "Wrist motion",
            y_desc: "Value",
        })
        .width(Length::Fill)
        .height(Length::Fill);

        column![phone_chart, wrist_chart]
            .spacing(10)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
