use {
    eframe::{
        Frame, Storage,
        egui::{
            Align, CentralPanel, Context, FontId, Layout, RichText, ScrollArea, TopBottomPanel,
        },
    },
    serde::{Deserialize, Serialize},
    std::sync::{Arc, mpsc::Receiver},
    tokio::runtime::Handle,
};

use crate::{
    Cli,
    app::{
        ChatState, OptimizationPage, PortfolioPage, Route, SearchPage, StockPage,
        TransactionsPage,
        tasks::{RepaintingSink, TaskResult, TaskRunner},
    },
    config::{BackendEndpoints, DF},
    data::{ConnectionStatus, DashboardApi, PriceStreamManager},
    domain::{LiveTick, Timeframe},
    ui::{
        UI_CONFIG, UI_TEXT, UiStyleExt, ViewAction, ViewModel, connection_badge,
        setup_custom_visuals, show_chat, show_optimization, show_portfolio, show_search,
        show_stock, show_transactions,
    },
};

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    /// Stock page that was open last; reopened on start.
    pub(crate) last_symbol: Option<String>,
    pub(crate) timeframe: Timeframe,
    #[serde(skip)]
    pub(crate) route: Route,
    #[serde(skip)]
    pub(crate) endpoints: BackendEndpoints,
    #[serde(skip)]
    tasks: Option<TaskRunner>,
    #[serde(skip)]
    results_rx: Option<Receiver<TaskResult>>,
    #[serde(skip)]
    stream: Option<PriceStreamManager>,
    #[serde(skip)]
    ticks_rx: Option<Receiver<LiveTick>>,
    #[serde(skip)]
    pub(crate) search: SearchPage,
    #[serde(skip)]
    pub(crate) stock: Option<StockPage>,
    #[serde(skip)]
    pub(crate) portfolio: PortfolioPage,
    #[serde(skip)]
    pub(crate) transactions: TransactionsPage,
    #[serde(skip)]
    pub(crate) optimization: OptimizationPage,
    #[serde(skip)]
    pub(crate) chat: ChatState,
    #[serde(skip)]
    chart_width: f32,
    #[serde(skip)]
    startup_error: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            last_symbol: None,
            timeframe: Timeframe::default(),
            route: Route::default(),
            endpoints: BackendEndpoints::default(),
            tasks: None,
            results_rx: None,
            stream: None,
            ticks_rx: None,
            search: SearchPage::default(),
            stock: None,
            portfolio: PortfolioPage::default(),
            transactions: TransactionsPage::default(),
            optimization: OptimizationPage::default(),
            chat: ChatState::default(),
            chart_width: 0.0,
            startup_error: None,
        }
    }
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli, handle: Handle) -> Self {
        let mut app: App = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        setup_custom_visuals(&cc.egui_ctx);

        app.endpoints = BackendEndpoints::with_overrides(args.market_url, args.ledger_url, args.stream_url);
        if let Some(tf) = args.timeframe {
            app.timeframe = tf;
        }

        match DashboardApi::new(&app.endpoints) {
            Ok(api) => {
                let (runner, rx) = TaskRunner::new(handle.clone(), Arc::new(api), cc.egui_ctx.clone());
                app.tasks = Some(runner);
                app.results_rx = Some(rx);
            }
            Err(e) => {
                log::error!("Backend configuration rejected: {}", e);
                app.startup_error = Some(e.to_string());
            }
        }

        let (sink, ticks_rx) = RepaintingSink::new(cc.egui_ctx.clone());
        app.stream = Some(PriceStreamManager::new(
            app.endpoints.stream_url.clone(),
            Arc::new(sink),
            &handle,
        ));
        app.ticks_rx = Some(ticks_rx);

        let start = match args.symbol.or_else(|| app.last_symbol.clone()) {
            Some(symbol) => Route::Stock(symbol.to_ascii_uppercase()),
            None => Route::Search,
        };
        app.navigate(start);

        app
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        #[cfg(debug_assertions)]
        if DF.log_navigation {
            log::info!("Navigate {} -> {}", self.route.path(), route.path());
        }

        match &route {
            Route::Stock(symbol) => {
                let same = self.stock.as_ref().is_some_and(|p| &p.symbol == symbol);
                if !same {
                    self.open_stock(symbol.clone());
                }
            }
            other => {
                self.close_stock();
                match other {
                    Route::Portfolio => self.refresh_portfolio(),
                    Route::Transactions => self.refresh_transactions(),
                    _ => {}
                }
            }
        }
        self.route = route;
    }

    fn open_stock(&mut self, symbol: String) {
        // Dropping the previous page tears its chart down.
        self.close_stock();

        let page = StockPage::new(symbol.clone(), self.timeframe, self.chart_width);
        self.stock = Some(page);
        self.last_symbol = Some(symbol.clone());

        if let (Some(tasks), Some(page)) = (&self.tasks, self.stock.as_mut()) {
            page.info.begin();
            tasks.stock_info(symbol.clone());
        }
        self.load_history();

        // Same manager for every symbol: the old socket is closed before
        // the new one subscribes.
        if let Some(stream) = &self.stream {
            stream.subscribe(vec![symbol]);
        }
    }

    fn close_stock(&mut self) {
        if let Some(page) = self.stock.take() {
            self.chart_width = page.last_width;
            if let Some(stream) = &self.stream {
                stream.unsubscribe();
            }
        }
    }

    fn load_history(&mut self) {
        let (Some(tasks), Some(page)) = (&self.tasks, self.stock.as_mut()) else {
            return;
        };
        page.history.begin();
        let generation = page.chart.begin_request();
        tasks.history(page.symbol.clone(), page.timeframe, generation);
    }

    fn refresh_portfolio(&mut self) {
        if let Some(tasks) = &self.tasks {
            self.portfolio.assets.begin();
            self.portfolio.summary.begin();
            tasks.portfolio();
        }
    }

    fn refresh_transactions(&mut self) {
        if let Some(tasks) = &self.tasks {
            self.transactions.list.begin();
            tasks.transactions();
        }
    }

    fn handle_action(&mut self, action: ViewAction) {
        match action {
            ViewAction::Navigate(route) => self.navigate(route),
            ViewAction::Search(query) => {
                if let Some(tasks) = &self.tasks {
                    self.search.begin(&query);
                    tasks.search(query);
                }
            }
            ViewAction::SetTimeframe(tf) => {
                self.timeframe = tf;
                if let Some(page) = self.stock.as_mut() {
                    page.timeframe = tf;
                }
                self.load_history();
            }
            ViewAction::RefreshPortfolio => self.refresh_portfolio(),
            ViewAction::RefreshTransactions => self.refresh_transactions(),
            ViewAction::CreateTransaction(tx) => {
                if let Some(tasks) = &self.tasks {
                    self.transactions.action_error = None;
                    tasks.create_transaction(tx);
                }
            }
            ViewAction::DeleteTransaction(id) => {
                if let Some(tasks) = &self.tasks {
                    self.transactions.action_error = None;
                    tasks.delete_transaction(id);
                }
            }
            ViewAction::Optimize {
                budget,
                risk_factor,
            } => {
                if let Some(tasks) = &self.tasks {
                    self.optimization.result.begin();
                    tasks.optimize(budget, risk_factor);
                }
            }
            ViewAction::SendChat(message) => {
                if let Some(tasks) = &self.tasks {
                    let history = self.chat.push_user(&message);
                    tasks.chat(message, history);
                }
            }
        }
    }

    fn drain_results(&mut self) {
        let Some(rx) = &self.results_rx else {
            return;
        };
        let results: Vec<TaskResult> = rx.try_iter().collect();
        for result in results {
            self.apply_result(result);
        }
    }

    fn apply_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Search { query, result } => {
                self.search.apply(query, result);
            }
            TaskResult::StockInfo { symbol, result } => {
                if let Some(page) = self.stock.as_mut().filter(|p| p.symbol == symbol) {
                    page.info.finish(result);
                }
            }
            TaskResult::History { generation, result } => {
                let Some(page) = self.stock.as_mut() else {
                    return;
                };
                if !page.chart.accepts(generation) {
                    #[cfg(debug_assertions)]
                    if DF.log_fetches {
                        log::info!("Discarding history for an earlier request (gen {})", generation);
                    }
                    return;
                }
                match result {
                    Ok(bars) => {
                        page.chart.apply_history(generation, bars);
                        page.history.finish(Ok(()));
                    }
                    Err(e) => page.history.finish(Err(e)),
                }
            }
            TaskResult::Assets(result) => self.portfolio.assets.finish(result),
            TaskResult::Summary(result) => self.portfolio.summary.finish(result),
            TaskResult::Transactions(result) => self.transactions.list.finish(result),
            TaskResult::TransactionCreated(result) => match result {
                Ok(tx) => {
                    log::info!("Recorded {} {} x{}", tx.kind, tx.symbol(), tx.quantity);
                    self.transactions.form = Default::default();
                    self.refresh_transactions();
                }
                Err(e) => {
                    log::warn!("Create transaction failed: {}", e);
                    self.transactions.action_error = Some(e);
                }
            },
            TaskResult::TransactionDeleted { id, result } => match result {
                Ok(()) => {
                    if let Some(list) = self.transactions.list.data.as_mut() {
                        list.retain(|t| t.id != id);
                    }
                }
                Err(e) => {
                    log::warn!("Delete transaction {} failed: {}", id, e);
                    self.transactions.action_error = Some(e);
                }
            },
            TaskResult::Optimization(result) => self.optimization.result.finish(result),
            TaskResult::Chat(result) => {
                self.chat
                    .finish(result, &UI_TEXT.chat_rate_limited, &UI_TEXT.chat_generic_error)
            }
        }
    }

    /// Ticks are applied one at a time, in arrival order.
    fn drain_ticks(&mut self) {
        let Some(rx) = &self.ticks_rx else {
            return;
        };
        let ticks: Vec<LiveTick> = rx.try_iter().collect();
        let Some(page) = self.stock.as_mut() else {
            return;
        };
        for tick in ticks.iter().filter(|t| t.symbol == page.symbol) {
            page.chart.apply_tick(tick);
            // Shown on the card even before any bars arrived.
            if tick.is_usable() {
                page.live_price = Some(tick.price);
            }
        }
    }

    fn connection_status(&self) -> ConnectionStatus {
        self.stream
            .as_ref()
            .map(|s| s.status())
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    fn render_nav(&mut self, ctx: &Context) -> Option<ViewAction> {
        let mut action = None;
        TopBottomPanel::top("nav_panel")
            .frame(UI_CONFIG.top_panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(&UI_TEXT.app_title)
                            .strong()
                            .size(18.0)
                            .color(UI_CONFIG.colors.accent),
                    );
                    ui.separator();

                    let font = FontId::proportional(14.0);
                    for (label, route) in [
                        (&UI_TEXT.nav_search, Route::Search),
                        (&UI_TEXT.nav_portfolio, Route::Portfolio),
                        (&UI_TEXT.nav_transactions, Route::Transactions),
                        (&UI_TEXT.nav_optimization, Route::Optimization),
                    ] {
                        let selected = self.route == route;
                        if ui
                            .interactive_label(label, selected, UI_CONFIG.colors.label, font.clone())
                            .clicked()
                            && !selected
                        {
                            action = Some(ViewAction::Navigate(route));
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui
                            .interactive_label(
                                &UI_TEXT.nav_chat,
                                self.chat.open,
                                UI_CONFIG.colors.label,
                                font.clone(),
                            )
                            .clicked()
                        {
                            self.chat.open = !self.chat.open;
                        }
                    });
                });
            });
        action
    }

    fn render_status(&self, ctx: &Context, vm: &ViewModel) {
        TopBottomPanel::bottom("status_panel")
            .frame(UI_CONFIG.bottom_panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if matches!(self.route, Route::Stock(_)) {
                        ui.label(connection_badge(vm.connection));
                        ui.separator();
                    }
                    ui.label_subdued(self.route.path());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label_subdued(format!("Ledger: {}", vm.ledger_url));
                        ui.label_subdued(format!("Market: {}", vm.market_url));
                    });
                });
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.drain_results();
        self.drain_ticks();

        let mut actions: Vec<ViewAction> = Vec::new();
        actions.extend(self.render_nav(ctx));

        let vm = ViewModel::new(&self.endpoints, self.connection_status());
        self.render_status(ctx, &vm);

        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                if let Some(err) = &self.startup_error {
                    ui.label_error(err);
                }
                let action = match &self.route {
                    Route::Search => show_search(ui, &vm, &mut self.search),
                    Route::Stock(_) => match self.stock.as_mut() {
                        Some(page) => ScrollArea::vertical()
                            .show(ui, |ui| show_stock(ui, &vm, page))
                            .inner,
                        None => None,
                    },
                    Route::Portfolio => show_portfolio(ui, &vm, &self.portfolio),
                    Route::Transactions => show_transactions(ui, &vm, &mut self.transactions),
                    Route::Optimization => show_optimization(ui, &vm, &mut self.optimization),
                };
                actions.extend(action);
            });

        actions.extend(show_chat(ctx, &vm, &mut self.chat));

        for action in actions {
            self.handle_action(action);
        }
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        #[cfg(debug_assertions)]
        if DF.log_navigation {
            log::info!(
                "SAVE [App]: last_symbol = {:?}, timeframe = {}",
                self.last_symbol,
                self.timeframe
            );
        }
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
