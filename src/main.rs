use bevy::prelude::*;

use nexus_desktop::defaults;
use nexus_desktop::nft::{GalleryView, MockNftSource, Nft, NftSource, gallery_view};
use nexus_desktop::tx::{
    AttemptId, ChainExecutor, ConfirmationGate, ExecutionError, MockChainExecutor,
    TransactionStatus, TxKind, TxLifecycle, TxPayload, TxReceipt,
};
use nexus_desktop::validation::{MintQuantity, is_valid_eth_address, mint_total};
use nexus_desktop::wallet::{
    MockWalletProvider, WalletError, WalletSession, truncate_address, truncate_recipient,
};

// Navigation
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
enum Tab {
    #[default]
    Gallery,
    Mint,
    Transfer,
}

impl Tab {
    fn label(&self) -> &'static str {
        match self {
            Tab::Gallery => "Gallery",
            Tab::Mint => "Mint",
            Tab::Transfer => "Transfer",
        }
    }
}

// Mock collaborators, injected as resources so a real provider could
// replace them without touching the systems.
#[derive(Resource)]
struct WalletProvider(MockWalletProvider);

#[derive(Resource)]
struct Executor(MockChainExecutor);

#[derive(Resource)]
struct NftCatalog(MockNftSource);

#[derive(Resource, Default)]
struct SessionState {
    connecting: bool,
    session: Option<WalletSession>,
}

impl SessionState {
    fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}

#[derive(Resource, Default)]
struct GalleryState {
    nfts: Vec<Nft>,
    selected: Option<Nft>,
}

#[derive(Resource)]
struct MintForm {
    quantity: MintQuantity,
    lifecycle: TxLifecycle,
}

impl Default for MintForm {
    fn default() -> Self {
        Self {
            quantity: MintQuantity::default(),
            lifecycle: TxLifecycle::new(TxKind::Mint),
        }
    }
}

#[derive(Resource)]
struct TransferForm {
    selected: Option<Nft>,
    recipient: String,
    dropdown_open: bool,
    gate: ConfirmationGate,
    lifecycle: TxLifecycle,
}

impl Default for TransferForm {
    fn default() -> Self {
        Self {
            selected: None,
            recipient: String::new(),
            dropdown_open: false,
            gate: ConfirmationGate::default(),
            lifecycle: TxLifecycle::new(TxKind::Transfer),
        }
    }
}

#[derive(Resource, Default)]
struct PendingTasks {
    connect: Option<bevy::tasks::Task<Result<WalletSession, WalletError>>>,
    mint: Option<(AttemptId, bevy::tasks::Task<Result<TxReceipt, ExecutionError>>)>,
    transfer: Option<(AttemptId, bevy::tasks::Task<Result<TxReceipt, ExecutionError>>)>,
}

#[derive(Resource, Default)]
struct FocusedInput {
    input_type: FocusedInputType,
}

#[derive(Default, Clone, Copy, PartialEq, Debug)]
enum FocusedInputType {
    #[default]
    None,
    TransferRecipient,
}

// UI Components
#[derive(Component)]
struct HeaderWalletArea;

#[derive(Component)]
struct ContentArea;

#[derive(Component)]
struct TabButton(Tab);

#[derive(Component)]
struct ConnectButton;

#[derive(Component)]
struct DisconnectButton;

#[derive(Component)]
struct NftCard(usize);

#[derive(Component)]
struct DetailOverlay;

#[derive(Component)]
struct CloseDetailButton;

#[derive(Component)]
struct DetailTransferButton;

#[derive(Component)]
struct QuantityButton(i8);

#[derive(Component)]
struct MintActionButton;

#[derive(Component)]
struct DismissButton(TxKind);

#[derive(Component)]
struct TransferDropdownButton;

#[derive(Component)]
struct NftOption(usize);

#[derive(Component)]
struct RecipientInput;

#[derive(Component)]
struct TransferActionButton;

#[derive(Component)]
struct ConfirmTransferButton;

#[derive(Component)]
struct CancelTransferButton;

const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.35, 0.35);
const ACCENT_BUTTON: Color = Color::srgb(0.2, 0.45, 0.85);
const ACCENT_HOVERED: Color = Color::srgb(0.3, 0.55, 0.95);
const DISABLED_BUTTON: Color = Color::srgb(0.45, 0.45, 0.45);
const PANEL_BG: Color = Color::srgb(0.13, 0.13, 0.16);
const INPUT_BG: Color = Color::srgb(0.2, 0.2, 0.2);
const ERROR_TEXT: Color = Color::srgb(0.9, 0.35, 0.35);
const SUCCESS_TEXT: Color = Color::srgb(0.35, 0.8, 0.45);
const MUTED_TEXT: Color = Color::srgb(0.6, 0.6, 0.65);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .init_state::<Tab>()
        .add_plugins(ShellPlugin)
        .add_plugins(GalleryPlugin)
        .add_plugins(FormsPlugin)
        .run();
}

pub struct ShellPlugin;

impl Plugin for ShellPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WalletProvider(MockWalletProvider::new()))
            .insert_resource(Executor(MockChainExecutor::new()))
            .insert_resource(NftCatalog(MockNftSource::new()))
            .insert_resource(SessionState::default())
            .insert_resource(GalleryState::default())
            .insert_resource(MintForm::default())
            .insert_resource(TransferForm::default())
            .insert_resource(PendingTasks::default())
            .insert_resource(FocusedInput::default())
            .add_systems(Startup, setup_shell)
            .add_systems(
                Update,
                (
                    tab_button_system,
                    header_render_system,
                    connect_button_system,
                    disconnect_button_system,
                    async_task_polling_system,
                ),
            );
    }
}

fn setup_shell(mut commands: Commands) {
    // UI Camera
    commands.spawn(Camera2d);

    commands
        .spawn((
            Node {
                display: Display::Flex,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.08, 0.1)),
        ))
        .with_children(|parent| {
            // Header: logo left, wallet area right
            parent
                .spawn((
                    Node {
                        display: Display::Flex,
                        width: Val::Percent(100.0),
                        height: Val::Px(64.0),
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        justify_content: JustifyContent::SpaceBetween,
                        padding: UiRect::horizontal(Val::Px(24.0)),
                        ..default()
                    },
                    BackgroundColor(PANEL_BG),
                ))
                .with_children(|parent| {
                    parent.spawn(Text::new("Nexus"));
                    parent.spawn((
                        Node {
                            display: Display::Flex,
                            flex_direction: FlexDirection::Row,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        HeaderWalletArea,
                    ));
                });

            // Page header
            parent.spawn((
                Text::new("Digital Assets"),
                Node {
                    margin: UiRect::new(Val::Px(24.0), Val::Px(24.0), Val::Px(20.0), Val::Px(4.0)),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("Manage your NFT collection with precision and elegance"),
                TextColor(MUTED_TEXT),
                Node {
                    margin: UiRect::new(Val::Px(24.0), Val::Px(24.0), Val::Px(0.0), Val::Px(12.0)),
                    ..default()
                },
            ));

            // Navigation tabs
            parent
                .spawn(Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Row,
                    margin: UiRect::horizontal(Val::Px(24.0)),
                    ..default()
                })
                .with_children(|parent| {
                    for tab in [Tab::Gallery, Tab::Mint, Tab::Transfer] {
                        let label = tab.label();
                        parent
                            .spawn((
                                Button,
                                TabButton(tab),
                                Node {
                                    width: Val::Px(120.0),
                                    height: Val::Px(40.0),
                                    border: UiRect::all(Val::Px(2.0)),
                                    justify_content: JustifyContent::Center,
                                    align_items: AlignItems::Center,
                                    margin: UiRect::right(Val::Px(8.0)),
                                    ..default()
                                },
                                BorderColor(Color::BLACK),
                                BorderRadius::new(
                                    Val::Px(5.0),
                                    Val::Px(5.0),
                                    Val::Px(5.0),
                                    Val::Px(5.0),
                                ),
                                BackgroundColor(NORMAL_BUTTON),
                            ))
                            .with_child(Text::new(label));
                    }
                });

            // Tab content, rebuilt by the per-tab render systems
            parent.spawn((
                Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::FlexStart,
                    flex_grow: 1.0,
                    padding: UiRect::all(Val::Px(24.0)),
                    ..default()
                },
                ContentArea,
            ));
        });
}

fn tab_button_system(
    mut interaction_query: Query<
        (&Interaction, &TabButton, &mut BackgroundColor, &mut BorderColor),
        Changed<Interaction>,
    >,
    mut next_tab: ResMut<NextState<Tab>>,
) {
    for (interaction, tab_button, mut color, mut border_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                next_tab.set(tab_button.0.clone());
                *color = PRESSED_BUTTON.into();
                border_color.0 = Color::WHITE;
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
                border_color.0 = Color::WHITE;
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
                border_color.0 = Color::BLACK;
            }
        }
    }
}

// Rebuilds the wallet corner of the header whenever the session changes.
fn header_render_system(
    session: Res<SessionState>,
    mut commands: Commands,
    query: Query<Entity, With<HeaderWalletArea>>,
) {
    if !session.is_changed() {
        return;
    }

    for entity in query.iter() {
        commands.entity(entity).despawn_descendants();
        commands.entity(entity).with_children(|parent| {
            match &session.session {
                Some(wallet) => {
                    parent.spawn((
                        Text::new("Ethereum"),
                        TextColor(SUCCESS_TEXT),
                        Node {
                            margin: UiRect::right(Val::Px(16.0)),
                            ..default()
                        },
                    ));
                    parent.spawn((
                        Text::new(format!("{} ETH", wallet.balance)),
                        Node {
                            margin: UiRect::right(Val::Px(16.0)),
                            ..default()
                        },
                    ));
                    parent.spawn((
                        Text::new(truncate_address(&wallet.address)),
                        TextColor(MUTED_TEXT),
                        Node {
                            margin: UiRect::right(Val::Px(16.0)),
                            ..default()
                        },
                    ));
                    parent
                        .spawn((
                            Button,
                            DisconnectButton,
                            Node {
                                width: Val::Px(120.0),
                                height: Val::Px(36.0),
                                border: UiRect::all(Val::Px(2.0)),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BorderColor(Color::BLACK),
                            BorderRadius::new(
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                            ),
                            BackgroundColor(NORMAL_BUTTON),
                        ))
                        .with_child(Text::new("Disconnect"));
                }
                None => {
                    parent
                        .spawn((
                            Button,
                            ConnectButton,
                            Node {
                                width: Val::Px(160.0),
                                height: Val::Px(36.0),
                                border: UiRect::all(Val::Px(2.0)),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BorderColor(Color::BLACK),
                            BorderRadius::new(
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                            ),
                            BackgroundColor(if session.connecting {
                                DISABLED_BUTTON
                            } else {
                                ACCENT_BUTTON
                            }),
                        ))
                        .with_child(Text::new(if session.connecting {
                            "Connecting..."
                        } else {
                            "Connect Wallet"
                        }));
                }
            }
        });
    }
}

fn spawn_connect_task(
    session: &mut SessionState,
    tasks: &mut PendingTasks,
    provider: &MockWalletProvider,
) {
    if session.connecting || session.is_connected() {
        return;
    }
    session.connecting = true;
    let provider = provider.clone();
    info!("Connecting wallet...");
    tasks.connect =
        Some(bevy::tasks::IoTaskPool::get().spawn(async move { provider.connect_blocking() }));
}

fn connect_button_system(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<ConnectButton>),
    >,
    mut session: ResMut<SessionState>,
    mut tasks: ResMut<PendingTasks>,
    provider: Res<WalletProvider>,
) {
    for (interaction, mut color, mut border_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                spawn_connect_task(&mut session, &mut tasks, &provider.0);
                *color = PRESSED_BUTTON.into();
                border_color.0 = Color::WHITE;
            }
            Interaction::Hovered => {
                *color = ACCENT_HOVERED.into();
                border_color.0 = Color::WHITE;
            }
            Interaction::None => {
                *color = ACCENT_BUTTON.into();
                border_color.0 = Color::BLACK;
            }
        }
    }
}

fn disconnect_button_system(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<DisconnectButton>),
    >,
    mut session: ResMut<SessionState>,
    mut gallery: ResMut<GalleryState>,
) {
    for (interaction, mut color, mut border_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                session.session = None;
                gallery.nfts.clear();
                gallery.selected = None;
                info!("Wallet disconnected");

                *color = PRESSED_BUTTON.into();
                border_color.0 = Color::srgb(1.0, 0.0, 0.0);
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
                border_color.0 = Color::WHITE;
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
                border_color.0 = Color::BLACK;
            }
        }
    }
}

fn async_task_polling_system(
    mut tasks: ResMut<PendingTasks>,
    mut session: ResMut<SessionState>,
    mut gallery: ResMut<GalleryState>,
    mut mint_form: ResMut<MintForm>,
    mut transfer_form: ResMut<TransferForm>,
    catalog: Res<NftCatalog>,
) {
    // Poll wallet connection
    if let Some(task) = tasks.connect.as_mut() {
        if let Some(result) = bevy::tasks::block_on(bevy::tasks::poll_once(task)) {
            tasks.connect = None;
            session.connecting = false;

            match result {
                Ok(wallet) => {
                    info!("Wallet connected: {}", wallet.address);
                    gallery.nfts = catalog.0.list_owned(&wallet.address);
                    session.session = Some(wallet);
                }
                Err(e) => {
                    error!("Failed to connect wallet: {}", e);
                }
            }
        }
    }

    // Poll mint execution
    if let Some((attempt, task)) = tasks.mint.as_mut() {
        if let Some(result) = bevy::tasks::block_on(bevy::tasks::poll_once(task)) {
            let attempt = *attempt;
            tasks.mint = None;
            mint_form.lifecycle.resolve(attempt, result);
        }
    }

    // Poll transfer execution
    if let Some((attempt, task)) = tasks.transfer.as_mut() {
        if let Some(result) = bevy::tasks::block_on(bevy::tasks::poll_once(task)) {
            let attempt = *attempt;
            tasks.transfer = None;
            if transfer_form.lifecycle.resolve(attempt, result)
                && transfer_form.lifecycle.status().hash().is_some()
            {
                // A completed transfer clears the form for the next one
                transfer_form.selected = None;
                transfer_form.recipient.clear();
                transfer_form.gate.cancel();
            }
        }
    }
}

pub struct GalleryPlugin;

impl Plugin for GalleryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                gallery_render_system.run_if(in_state(Tab::Gallery)),
                nft_card_system.run_if(in_state(Tab::Gallery)),
                detail_overlay_render_system,
                detail_button_system,
            ),
        );
    }
}

fn gallery_render_system(
    tab: Res<State<Tab>>,
    session: Res<SessionState>,
    gallery: Res<GalleryState>,
    mut commands: Commands,
    query: Query<Entity, With<ContentArea>>,
) {
    if !(tab.is_changed() || session.is_changed() || gallery.is_changed()) {
        return;
    }

    let view = gallery_view(session.connecting, session.is_connected(), gallery.nfts.len());

    for entity in query.iter() {
        commands.entity(entity).despawn_descendants();
        commands.entity(entity).with_children(|parent| match view {
            GalleryView::Loading => {
                parent
                    .spawn(Node {
                        display: Display::Grid,
                        grid_template_columns: vec![RepeatedGridTrack::fr(3, 1.0)],
                        column_gap: Val::Px(16.0),
                        row_gap: Val::Px(16.0),
                        width: Val::Percent(100.0),
                        ..default()
                    })
                    .with_children(|parent| {
                        for _ in 0..6 {
                            parent.spawn((
                                Node {
                                    height: Val::Px(220.0),
                                    ..default()
                                },
                                BackgroundColor(Color::srgb(0.18, 0.18, 0.22)),
                                BorderRadius::new(
                                    Val::Px(8.0),
                                    Val::Px(8.0),
                                    Val::Px(8.0),
                                    Val::Px(8.0),
                                ),
                            ));
                        }
                    });
            }
            GalleryView::NotConnected => {
                parent.spawn(Text::new("Wallet Not Connected"));
                parent.spawn((
                    Text::new("Connect your wallet to view your NFT collection."),
                    TextColor(MUTED_TEXT),
                    Node {
                        margin: UiRect::top(Val::Px(8.0)),
                        ..default()
                    },
                ));
            }
            GalleryView::Empty => {
                parent.spawn(Text::new("No NFTs Found"));
                parent.spawn((
                    Text::new("This wallet does not own any NFTs yet."),
                    TextColor(MUTED_TEXT),
                    Node {
                        margin: UiRect::top(Val::Px(8.0)),
                        ..default()
                    },
                ));
            }
            GalleryView::Populated => {
                parent
                    .spawn(Node {
                        display: Display::Grid,
                        grid_template_columns: vec![RepeatedGridTrack::fr(3, 1.0)],
                        column_gap: Val::Px(16.0),
                        row_gap: Val::Px(16.0),
                        width: Val::Percent(100.0),
                        ..default()
                    })
                    .with_children(|parent| {
                        for (index, nft) in gallery.nfts.iter().enumerate() {
                            spawn_nft_card(parent, index, nft);
                        }
                    });
            }
        });
    }
}

fn spawn_nft_card(parent: &mut ChildBuilder, index: usize, nft: &Nft) {
    parent
        .spawn((
            Button,
            NftCard(index),
            Node {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                padding: UiRect::all(Val::Px(12.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(Color::BLACK),
            BorderRadius::new(Val::Px(8.0), Val::Px(8.0), Val::Px(8.0), Val::Px(8.0)),
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|parent| {
            // Artwork placeholder; remote images are out of scope
            parent.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(120.0),
                    margin: UiRect::bottom(Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.22, 0.2, 0.3)),
                BorderRadius::new(Val::Px(6.0), Val::Px(6.0), Val::Px(6.0), Val::Px(6.0)),
            ));
            parent.spawn((Text::new(nft.collection.clone()), TextColor(MUTED_TEXT)));
            parent.spawn(Text::new(nft.name.clone()));
            parent.spawn((
                Text::new(format!("#{}", nft.token_id)),
                TextColor(MUTED_TEXT),
            ));
            parent.spawn((
                Text::new(truncate_address(&nft.owner)),
                TextColor(MUTED_TEXT),
            ));
        });
}

fn nft_card_system(
    mut interaction_query: Query<(&Interaction, &NftCard, &mut BorderColor), Changed<Interaction>>,
    mut gallery: ResMut<GalleryState>,
) {
    for (interaction, card, mut border_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                if let Some(nft) = gallery.nfts.get(card.0).cloned() {
                    info!("Opening detail view for {}", nft.name);
                    gallery.selected = Some(nft);
                }
                border_color.0 = Color::WHITE;
            }
            Interaction::Hovered => {
                border_color.0 = Color::WHITE;
            }
            Interaction::None => {
                border_color.0 = Color::BLACK;
            }
        }
    }
}

fn detail_overlay_render_system(
    gallery: Res<GalleryState>,
    mut commands: Commands,
    overlay_query: Query<Entity, With<DetailOverlay>>,
) {
    if !gallery.is_changed() {
        return;
    }

    for entity in overlay_query.iter() {
        commands.entity(entity).despawn_recursive();
    }

    let Some(nft) = &gallery.selected else {
        return;
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            ZIndex(10),
            DetailOverlay,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        display: Display::Flex,
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::FlexStart,
                        width: Val::Px(480.0),
                        padding: UiRect::all(Val::Px(24.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BorderColor(Color::BLACK),
                    BorderRadius::new(Val::Px(8.0), Val::Px(8.0), Val::Px(8.0), Val::Px(8.0)),
                    BackgroundColor(PANEL_BG),
                ))
                .with_children(|parent| {
                    parent.spawn(Text::new(nft.name.clone()));
                    parent.spawn((
                        Text::new(nft.collection.clone()),
                        TextColor(MUTED_TEXT),
                        Node {
                            margin: UiRect::bottom(Val::Px(12.0)),
                            ..default()
                        },
                    ));
                    parent.spawn((
                        Text::new(nft.description.clone()),
                        Node {
                            margin: UiRect::bottom(Val::Px(12.0)),
                            max_width: Val::Px(420.0),
                            ..default()
                        },
                    ));
                    parent.spawn((
                        Text::new(format!("Token ID: #{}", nft.token_id)),
                        TextColor(MUTED_TEXT),
                    ));
                    parent.spawn((
                        Text::new(format!("Owner: {}", truncate_address(&nft.owner))),
                        TextColor(MUTED_TEXT),
                    ));
                    parent.spawn((
                        Text::new(format!(
                            "Contract: {}",
                            truncate_address(&nft.contract_address)
                        )),
                        TextColor(MUTED_TEXT),
                        Node {
                            margin: UiRect::bottom(Val::Px(16.0)),
                            ..default()
                        },
                    ));

                    parent
                        .spawn(Node {
                            display: Display::Flex,
                            flex_direction: FlexDirection::Row,
                            ..default()
                        })
                        .with_children(|parent| {
                            parent
                                .spawn((
                                    Button,
                                    DetailTransferButton,
                                    Node {
                                        width: Val::Px(140.0),
                                        height: Val::Px(40.0),
                                        border: UiRect::all(Val::Px(2.0)),
                                        justify_content: JustifyContent::Center,
                                        align_items: AlignItems::Center,
                                        margin: UiRect::right(Val::Px(8.0)),
                                        ..default()
                                    },
                                    BorderColor(Color::BLACK),
                                    BorderRadius::new(
                                        Val::Px(5.0),
                                        Val::Px(5.0),
                                        Val::Px(5.0),
                                        Val::Px(5.0),
                                    ),
                                    BackgroundColor(ACCENT_BUTTON),
                                ))
                                .with_child(Text::new("Transfer"));

                            parent
                                .spawn((
                                    Button,
                                    CloseDetailButton,
                                    Node {
                                        width: Val::Px(100.0),
                                        height: Val::Px(40.0),
                                        border: UiRect::all(Val::Px(2.0)),
                                        justify_content: JustifyContent::Center,
                                        align_items: AlignItems::Center,
                                        ..default()
                                    },
                                    BorderColor(Color::BLACK),
                                    BorderRadius::new(
                                        Val::Px(5.0),
                                        Val::Px(5.0),
                                        Val::Px(5.0),
                                        Val::Px(5.0),
                                    ),
                                    BackgroundColor(NORMAL_BUTTON),
                                ))
                                .with_child(Text::new("Close"));
                        });
                });
        });
}

fn detail_button_system(
    mut close_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<CloseDetailButton>, Without<DetailTransferButton>),
    >,
    mut transfer_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<DetailTransferButton>, Without<CloseDetailButton>),
    >,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut gallery: ResMut<GalleryState>,
    mut transfer_form: ResMut<TransferForm>,
    mut next_tab: ResMut<NextState<Tab>>,
) {
    if keyboard_input.just_pressed(KeyCode::Escape) && gallery.selected.is_some() {
        gallery.selected = None;
    }

    for (interaction, mut color) in &mut close_query {
        match *interaction {
            Interaction::Pressed => {
                gallery.selected = None;
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
            }
        }
    }

    // Hands the NFT straight to the transfer form
    for (interaction, mut color) in &mut transfer_query {
        match *interaction {
            Interaction::Pressed => {
                if let Some(nft) = gallery.selected.take() {
                    info!("Starting transfer of {} from detail view", nft.name);
                    transfer_form.selected = Some(nft);
                    next_tab.set(Tab::Transfer);
                }
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = ACCENT_HOVERED.into();
            }
            Interaction::None => {
                *color = ACCENT_BUTTON.into();
            }
        }
    }
}

pub struct FormsPlugin;

impl Plugin for FormsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                mint_render_system.run_if(in_state(Tab::Mint)),
                mint_quantity_system.run_if(in_state(Tab::Mint)),
                mint_action_system.run_if(in_state(Tab::Mint)),
                transfer_render_system.run_if(in_state(Tab::Transfer)),
                transfer_dropdown_system.run_if(in_state(Tab::Transfer)),
                recipient_input_system.run_if(in_state(Tab::Transfer)),
                transfer_action_system.run_if(in_state(Tab::Transfer)),
                dismiss_button_system,
            ),
        );
    }
}

fn spawn_status_banner(parent: &mut ChildBuilder, status: &TransactionStatus, kind: TxKind) {
    let Some(message) = status.message() else {
        return;
    };

    let (text_color, detail) = match status {
        TransactionStatus::Success { hash, .. } => {
            (SUCCESS_TEXT, Some(format!("Tx: {}", truncate_address(hash))))
        }
        TransactionStatus::Error { .. } => (ERROR_TEXT, None),
        _ => (MUTED_TEXT, None),
    };

    parent
        .spawn((
            Node {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                padding: UiRect::all(Val::Px(12.0)),
                margin: UiRect::vertical(Val::Px(12.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(Color::BLACK),
            BorderRadius::new(Val::Px(6.0), Val::Px(6.0), Val::Px(6.0), Val::Px(6.0)),
            BackgroundColor(INPUT_BG),
        ))
        .with_children(|parent| {
            parent.spawn((Text::new(message.to_string()), TextColor(text_color)));
            if let Some(detail) = detail {
                parent.spawn((Text::new(detail), TextColor(MUTED_TEXT)));
            }

            // No dismissing a pending transaction
            if !status.is_pending() {
                parent
                    .spawn((
                        Button,
                        DismissButton(kind),
                        Node {
                            width: Val::Px(100.0),
                            height: Val::Px(32.0),
                            border: UiRect::all(Val::Px(2.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            margin: UiRect::top(Val::Px(8.0)),
                            ..default()
                        },
                        BorderColor(Color::BLACK),
                        BorderRadius::new(Val::Px(5.0), Val::Px(5.0), Val::Px(5.0), Val::Px(5.0)),
                        BackgroundColor(NORMAL_BUTTON),
                    ))
                    .with_child(Text::new("Dismiss"));
            }
        });
}

fn mint_render_system(
    tab: Res<State<Tab>>,
    session: Res<SessionState>,
    mint_form: Res<MintForm>,
    mut commands: Commands,
    query: Query<Entity, With<ContentArea>>,
) {
    if !(tab.is_changed() || session.is_changed() || mint_form.is_changed()) {
        return;
    }

    let quantity = mint_form.quantity.get();
    let pending = mint_form.lifecycle.status().is_pending();

    for entity in query.iter() {
        commands.entity(entity).despawn_descendants();
        commands.entity(entity).with_children(|parent| {
            parent.spawn(Text::new("Mint NFT"));
            parent.spawn((
                Text::new("Create a new token from the Lumina Collection"),
                TextColor(MUTED_TEXT),
                Node {
                    margin: UiRect::bottom(Val::Px(16.0)),
                    ..default()
                },
            ));

            // Collection preview
            parent
                .spawn((
                    Node {
                        display: Display::Flex,
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(12.0)),
                        margin: UiRect::bottom(Val::Px(16.0)),
                        ..default()
                    },
                    BackgroundColor(PANEL_BG),
                    BorderRadius::new(Val::Px(8.0), Val::Px(8.0), Val::Px(8.0), Val::Px(8.0)),
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Node {
                            width: Val::Px(64.0),
                            height: Val::Px(64.0),
                            margin: UiRect::right(Val::Px(12.0)),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.22, 0.2, 0.3)),
                        BorderRadius::new(Val::Px(6.0), Val::Px(6.0), Val::Px(6.0), Val::Px(6.0)),
                    ));
                    parent.spawn(Text::new("Lumina Collection"));
                });

            // Quantity controls
            parent.spawn((Text::new("Quantity"), TextColor(MUTED_TEXT)));
            parent
                .spawn(Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    margin: UiRect::vertical(Val::Px(8.0)),
                    ..default()
                })
                .with_children(|parent| {
                    spawn_quantity_button(parent, "-", -1);
                    parent.spawn((
                        Text::new(format!("{}", quantity)),
                        Node {
                            margin: UiRect::horizontal(Val::Px(16.0)),
                            ..default()
                        },
                    ));
                    spawn_quantity_button(parent, "+", 1);
                });

            // Price breakdown
            parent.spawn((
                Text::new(format!("Price per token: {} ETH", defaults::MINT_PRICE_ETH)),
                TextColor(MUTED_TEXT),
            ));
            parent.spawn((
                Text::new(format!("Network fee: ~{} ETH", defaults::NETWORK_FEE_ETH)),
                TextColor(MUTED_TEXT),
            ));
            parent.spawn((
                Text::new(format!("Total: {:.3} ETH", mint_total(quantity))),
                Node {
                    margin: UiRect::bottom(Val::Px(12.0)),
                    ..default()
                },
            ));

            spawn_status_banner(parent, mint_form.lifecycle.status(), TxKind::Mint);

            // Action button
            let (label, color) = if !session.is_connected() {
                ("Connect Wallet", ACCENT_BUTTON)
            } else if pending {
                ("Minting...", DISABLED_BUTTON)
            } else {
                ("Mint", ACCENT_BUTTON)
            };
            parent
                .spawn((
                    Button,
                    MintActionButton,
                    Node {
                        width: Val::Px(200.0),
                        height: Val::Px(48.0),
                        border: UiRect::all(Val::Px(2.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        margin: UiRect::top(Val::Px(8.0)),
                        ..default()
                    },
                    BorderColor(Color::BLACK),
                    BorderRadius::new(Val::Px(5.0), Val::Px(5.0), Val::Px(5.0), Val::Px(5.0)),
                    BackgroundColor(color),
                ))
                .with_child(Text::new(label));
        });
    }
}

fn spawn_quantity_button(parent: &mut ChildBuilder, label: &str, delta: i8) {
    parent
        .spawn((
            Button,
            QuantityButton(delta),
            Node {
                width: Val::Px(40.0),
                height: Val::Px(40.0),
                border: UiRect::all(Val::Px(2.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BorderColor(Color::BLACK),
            BorderRadius::new(Val::Px(5.0), Val::Px(5.0), Val::Px(5.0), Val::Px(5.0)),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_child(Text::new(label.to_string()));
}

fn mint_quantity_system(
    mut interaction_query: Query<
        (&Interaction, &QuantityButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut mint_form: ResMut<MintForm>,
) {
    for (interaction, button, mut color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                mint_form.quantity = if button.0 > 0 {
                    mint_form.quantity.increment()
                } else {
                    mint_form.quantity.decrement()
                };
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
            }
        }
    }
}

fn mint_action_system(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<MintActionButton>),
    >,
    mut session: ResMut<SessionState>,
    mut mint_form: ResMut<MintForm>,
    mut tasks: ResMut<PendingTasks>,
    provider: Res<WalletProvider>,
    executor: Res<Executor>,
) {
    for (interaction, mut color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                if !session.is_connected() {
                    spawn_connect_task(&mut session, &mut tasks, &provider.0);
                } else {
                    let payload = TxPayload::Mint {
                        quantity: mint_form.quantity.get(),
                    };
                    match mint_form.lifecycle.submit(&payload, true) {
                        Ok(attempt) => {
                            let executor = executor.0.clone();
                            tasks.mint = Some((
                                attempt,
                                bevy::tasks::IoTaskPool::get()
                                    .spawn(async move { executor.execute(&payload) }),
                            ));
                        }
                        Err(e) => {
                            info!("Mint submit rejected: {}", e);
                        }
                    }
                }
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = ACCENT_HOVERED.into();
            }
            Interaction::None => {
                *color = if mint_form.lifecycle.status().is_pending() {
                    DISABLED_BUTTON.into()
                } else {
                    ACCENT_BUTTON.into()
                };
            }
        }
    }
}

fn dismiss_button_system(
    mut interaction_query: Query<
        (&Interaction, &DismissButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut mint_form: ResMut<MintForm>,
    mut transfer_form: ResMut<TransferForm>,
) {
    for (interaction, dismiss, mut color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                let result = match dismiss.0 {
                    TxKind::Mint => mint_form.lifecycle.reset(),
                    TxKind::Transfer => {
                        transfer_form.gate.cancel();
                        transfer_form.lifecycle.reset()
                    }
                };
                if let Err(e) = result {
                    info!("Dismiss rejected: {}", e);
                }
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
            }
        }
    }
}

fn transfer_render_system(
    tab: Res<State<Tab>>,
    session: Res<SessionState>,
    gallery: Res<GalleryState>,
    transfer_form: Res<TransferForm>,
    focused_input: Res<FocusedInput>,
    mut commands: Commands,
    query: Query<Entity, With<ContentArea>>,
) {
    if !(tab.is_changed()
        || session.is_changed()
        || transfer_form.is_changed()
        || focused_input.is_changed())
    {
        return;
    }

    let connected = session.is_connected();
    let pending = transfer_form.lifecycle.status().is_pending();
    let address_valid = is_valid_eth_address(&transfer_form.recipient);
    let recipient_focused = focused_input.input_type == FocusedInputType::TransferRecipient;

    for entity in query.iter() {
        commands.entity(entity).despawn_descendants();
        commands.entity(entity).with_children(|parent| {
            parent.spawn(Text::new("Transfer NFT"));
            parent.spawn((
                Text::new("Send a token from your collection to another address"),
                TextColor(MUTED_TEXT),
                Node {
                    margin: UiRect::bottom(Val::Px(16.0)),
                    ..default()
                },
            ));

            // NFT selector
            parent.spawn((Text::new("Select NFT"), TextColor(MUTED_TEXT)));
            let selector_label = match (&transfer_form.selected, connected) {
                (Some(nft), _) => nft.name.clone(),
                (None, false) => "Connect wallet first".to_string(),
                (None, true) if gallery.nfts.is_empty() => "No NFTs available".to_string(),
                (None, true) => "Select an NFT".to_string(),
            };
            parent
                .spawn((
                    Button,
                    TransferDropdownButton,
                    Node {
                        width: Val::Px(400.0),
                        height: Val::Px(40.0),
                        border: UiRect::all(Val::Px(2.0)),
                        justify_content: JustifyContent::FlexStart,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(10.0)),
                        margin: UiRect::vertical(Val::Px(8.0)),
                        ..default()
                    },
                    BorderColor(Color::WHITE),
                    BackgroundColor(INPUT_BG),
                ))
                .with_child(Text::new(selector_label));

            if transfer_form.dropdown_open {
                parent
                    .spawn((
                        Node {
                            display: Display::Flex,
                            flex_direction: FlexDirection::Column,
                            width: Val::Px(400.0),
                            margin: UiRect::bottom(Val::Px(8.0)),
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BorderColor(Color::WHITE),
                        BackgroundColor(PANEL_BG),
                    ))
                    .with_children(|parent| {
                        for (index, nft) in gallery.nfts.iter().enumerate() {
                            parent
                                .spawn((
                                    Button,
                                    NftOption(index),
                                    Node {
                                        width: Val::Percent(100.0),
                                        height: Val::Px(36.0),
                                        justify_content: JustifyContent::FlexStart,
                                        align_items: AlignItems::Center,
                                        padding: UiRect::horizontal(Val::Px(10.0)),
                                        ..default()
                                    },
                                    BackgroundColor(PANEL_BG),
                                ))
                                .with_child(Text::new(format!(
                                    "{} (#{})",
                                    nft.name, nft.token_id
                                )));
                        }
                    });
            }

            // Recipient address
            parent.spawn((Text::new("Recipient Address"), TextColor(MUTED_TEXT)));
            parent
                .spawn((
                    Button,
                    RecipientInput,
                    Node {
                        width: Val::Px(400.0),
                        height: Val::Px(40.0),
                        border: UiRect::all(Val::Px(2.0)),
                        justify_content: JustifyContent::FlexStart,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(10.0)),
                        margin: UiRect::vertical(Val::Px(8.0)),
                        ..default()
                    },
                    BorderColor(if recipient_focused {
                        Color::srgb(0.5, 0.5, 1.0)
                    } else {
                        Color::WHITE
                    }),
                    BackgroundColor(INPUT_BG),
                ))
                .with_child(Text::new(if transfer_form.recipient.is_empty() {
                    "0x...".to_string()
                } else {
                    transfer_form.recipient.clone()
                }));

            if !transfer_form.recipient.is_empty() && !address_valid {
                parent.spawn((
                    Text::new("Please enter a valid Ethereum address"),
                    TextColor(ERROR_TEXT),
                    Node {
                        margin: UiRect::bottom(Val::Px(8.0)),
                        ..default()
                    },
                ));
            }

            spawn_status_banner(parent, transfer_form.lifecycle.status(), TxKind::Transfer);

            if transfer_form.gate.is_awaiting() {
                spawn_confirmation_panel(parent, &transfer_form);
            } else {
                let ready =
                    connected && transfer_form.selected.is_some() && address_valid && !pending;
                let (label, color) = if !connected {
                    ("Connect Wallet", ACCENT_BUTTON)
                } else if pending {
                    ("Transferring...", DISABLED_BUTTON)
                } else if !ready {
                    ("Transfer", DISABLED_BUTTON)
                } else {
                    ("Transfer", ACCENT_BUTTON)
                };
                parent
                    .spawn((
                        Button,
                        TransferActionButton,
                        Node {
                            width: Val::Px(200.0),
                            height: Val::Px(48.0),
                            border: UiRect::all(Val::Px(2.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            margin: UiRect::top(Val::Px(8.0)),
                            ..default()
                        },
                        BorderColor(Color::BLACK),
                        BorderRadius::new(Val::Px(5.0), Val::Px(5.0), Val::Px(5.0), Val::Px(5.0)),
                        BackgroundColor(color),
                    ))
                    .with_child(Text::new(label));
            }
        });
    }
}

fn spawn_confirmation_panel(parent: &mut ChildBuilder, transfer_form: &TransferForm) {
    parent
        .spawn((
            Node {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                padding: UiRect::all(Val::Px(16.0)),
                margin: UiRect::vertical(Val::Px(12.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(Color::WHITE),
            BorderRadius::new(Val::Px(8.0), Val::Px(8.0), Val::Px(8.0), Val::Px(8.0)),
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|parent| {
            parent.spawn(Text::new("Confirm Transfer"));
            if let Some(nft) = &transfer_form.selected {
                parent.spawn((
                    Text::new(format!("{} (#{})", nft.name, nft.token_id)),
                    TextColor(MUTED_TEXT),
                ));
            }
            parent.spawn((
                Text::new(format!(
                    "To: {}",
                    truncate_recipient(&transfer_form.recipient)
                )),
                TextColor(MUTED_TEXT),
                Node {
                    margin: UiRect::bottom(Val::Px(12.0)),
                    ..default()
                },
            ));

            parent
                .spawn(Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Row,
                    ..default()
                })
                .with_children(|parent| {
                    parent
                        .spawn((
                            Button,
                            CancelTransferButton,
                            Node {
                                width: Val::Px(100.0),
                                height: Val::Px(40.0),
                                border: UiRect::all(Val::Px(2.0)),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                margin: UiRect::right(Val::Px(8.0)),
                                ..default()
                            },
                            BorderColor(Color::BLACK),
                            BorderRadius::new(
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                            ),
                            BackgroundColor(NORMAL_BUTTON),
                        ))
                        .with_child(Text::new("Cancel"));

                    parent
                        .spawn((
                            Button,
                            ConfirmTransferButton,
                            Node {
                                width: Val::Px(120.0),
                                height: Val::Px(40.0),
                                border: UiRect::all(Val::Px(2.0)),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BorderColor(Color::BLACK),
                            BorderRadius::new(
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                                Val::Px(5.0),
                            ),
                            BackgroundColor(ACCENT_BUTTON),
                        ))
                        .with_child(Text::new("Confirm"));
                });
        });
}

fn transfer_dropdown_system(
    mut dropdown_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<TransferDropdownButton>, Without<NftOption>),
    >,
    mut option_query: Query<
        (&Interaction, &NftOption, &mut BackgroundColor),
        (Changed<Interaction>, Without<TransferDropdownButton>),
    >,
    session: Res<SessionState>,
    gallery: Res<GalleryState>,
    mut transfer_form: ResMut<TransferForm>,
    mut focused_input: ResMut<FocusedInput>,
) {
    for (interaction, mut color) in &mut dropdown_query {
        match *interaction {
            Interaction::Pressed => {
                focused_input.input_type = FocusedInputType::None;
                if session.is_connected()
                    && !gallery.nfts.is_empty()
                    && !transfer_form.lifecycle.status().is_pending()
                {
                    transfer_form.dropdown_open = !transfer_form.dropdown_open;
                }
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = INPUT_BG.into();
            }
        }
    }

    for (interaction, option, mut color) in &mut option_query {
        match *interaction {
            Interaction::Pressed => {
                if let Some(nft) = gallery.nfts.get(option.0).cloned() {
                    info!("Selected {} for transfer", nft.name);
                    transfer_form.selected = Some(nft);
                }
                transfer_form.dropdown_open = false;
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = PANEL_BG.into();
            }
        }
    }
}

fn recipient_input_system(
    mut input_query: Query<
        (&Interaction, &mut BorderColor),
        (Changed<Interaction>, With<RecipientInput>),
    >,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut transfer_form: ResMut<TransferForm>,
    mut focused_input: ResMut<FocusedInput>,
) {
    for (interaction, mut border_color) in &mut input_query {
        if *interaction == Interaction::Pressed {
            focused_input.input_type = FocusedInputType::TransferRecipient;
            border_color.0 = Color::srgb(0.5, 0.5, 1.0);
        }
    }

    if focused_input.input_type != FocusedInputType::TransferRecipient {
        return;
    }

    if keyboard_input.just_pressed(KeyCode::Escape) {
        focused_input.input_type = FocusedInputType::None;
        return;
    }

    if keyboard_input.just_pressed(KeyCode::Backspace)
        || keyboard_input.just_pressed(KeyCode::Delete)
    {
        if !transfer_form.recipient.is_empty() {
            transfer_form.recipient.pop();
        }
    }

    for key_code in keyboard_input.get_just_pressed() {
        if let Some(c) = key_to_address_char(*key_code) {
            if transfer_form.recipient.len() < 42 {
                transfer_form.recipient.push(c);
            }
        }
    }
}

// Addresses only need hex digits and the "0x" prefix.
fn key_to_address_char(key_code: KeyCode) -> Option<char> {
    match key_code {
        KeyCode::KeyA => Some('a'),
        KeyCode::KeyB => Some('b'),
        KeyCode::KeyC => Some('c'),
        KeyCode::KeyD => Some('d'),
        KeyCode::KeyE => Some('e'),
        KeyCode::KeyF => Some('f'),
        KeyCode::KeyX => Some('x'),
        KeyCode::Digit0 => Some('0'),
        KeyCode::Digit1 => Some('1'),
        KeyCode::Digit2 => Some('2'),
        KeyCode::Digit3 => Some('3'),
        KeyCode::Digit4 => Some('4'),
        KeyCode::Digit5 => Some('5'),
        KeyCode::Digit6 => Some('6'),
        KeyCode::Digit7 => Some('7'),
        KeyCode::Digit8 => Some('8'),
        KeyCode::Digit9 => Some('9'),
        _ => None,
    }
}

fn transfer_action_system(
    mut action_query: Query<
        (&Interaction, &mut BackgroundColor),
        (
            Changed<Interaction>,
            With<TransferActionButton>,
            Without<ConfirmTransferButton>,
            Without<CancelTransferButton>,
        ),
    >,
    mut confirm_query: Query<
        (&Interaction, &mut BackgroundColor),
        (
            Changed<Interaction>,
            With<ConfirmTransferButton>,
            Without<TransferActionButton>,
            Without<CancelTransferButton>,
        ),
    >,
    mut cancel_query: Query<
        (&Interaction, &mut BackgroundColor),
        (
            Changed<Interaction>,
            With<CancelTransferButton>,
            Without<TransferActionButton>,
            Without<ConfirmTransferButton>,
        ),
    >,
    mut session: ResMut<SessionState>,
    mut transfer_form: ResMut<TransferForm>,
    mut tasks: ResMut<PendingTasks>,
    provider: Res<WalletProvider>,
    executor: Res<Executor>,
) {
    // First step: arm the confirmation gate, nothing is executed yet
    for (interaction, mut color) in &mut action_query {
        match *interaction {
            Interaction::Pressed => {
                if !session.is_connected() {
                    spawn_connect_task(&mut session, &mut tasks, &provider.0);
                } else if transfer_form.selected.is_some()
                    && is_valid_eth_address(&transfer_form.recipient)
                    && !transfer_form.lifecycle.status().is_pending()
                {
                    transfer_form.gate.request();
                }
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = ACCENT_HOVERED.into();
            }
            Interaction::None => {}
        }
    }

    // Second step: a confirmed gate performs the real submit
    for (interaction, mut color) in &mut confirm_query {
        match *interaction {
            Interaction::Pressed => {
                if transfer_form.gate.confirm() {
                    let payload = match &transfer_form.selected {
                        Some(nft) => TxPayload::Transfer {
                            token_id: nft.token_id.clone(),
                            recipient: transfer_form.recipient.clone(),
                        },
                        None => continue,
                    };
                    match transfer_form.lifecycle.submit(&payload, session.is_connected()) {
                        Ok(attempt) => {
                            let executor = executor.0.clone();
                            tasks.transfer = Some((
                                attempt,
                                bevy::tasks::IoTaskPool::get()
                                    .spawn(async move { executor.execute(&payload) }),
                            ));
                        }
                        Err(e) => {
                            info!("Transfer submit rejected: {}", e);
                        }
                    }
                }
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = ACCENT_HOVERED.into();
            }
            Interaction::None => {
                *color = ACCENT_BUTTON.into();
            }
        }
    }

    for (interaction, mut color) in &mut cancel_query {
        match *interaction {
            Interaction::Pressed => {
                transfer_form.gate.cancel();
                *color = PRESSED_BUTTON.into();
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
            }
        }
    }
}
