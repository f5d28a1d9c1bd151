// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use passage_entitlements::{
    EligibilityGate, EntitlementStore, Product, PurchaseError, PurchaseOutcome, ReceiptReader,
    MAX_FREE_HOSTS,
};
use passage_profiles::{Profile, ProfileManager, ProfileStorage};

use crate::error::Error;

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Clone, Debug)]
pub enum AccountCommand {
    ReloadReceipt,
    ReviewPurchases,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountEvent {
    ReceiptReloaded,
    PurchasesReviewed(ReviewSummary),
}

/// What a review pass actually changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub trust_resets: usize,
    pub removed_host_profiles: usize,
    pub removed_provider_profiles: usize,
}

impl ReviewSummary {
    pub fn mutated(&self) -> bool {
        self.trust_resets > 0
            || self.removed_host_profiles > 0
            || self.removed_provider_profiles > 0
    }
}

/// Handle into the tunnel layer. The controller only ever asks for a
/// disconnect; it never drives tunnel state directly.
#[allow(async_fn_in_trait)]
pub trait TunnelControl {
    async fn request_disconnect(&self);
}

/// Platform purchase flow. Backing out is an outcome, not an error.
#[allow(async_fn_in_trait)]
pub trait PurchaseBackend {
    async fn purchase(&self, product: &Product) -> Result<PurchaseOutcome, PurchaseError>;
    async fn restore_purchases(&self) -> Result<(), PurchaseError>;
}

/// Single-task owner of the entitlement/profile interplay. Running all
/// receipt reloads and revocation passes on one command loop keeps
/// read-entitlements, mutate-profiles and persist from interleaving.
pub struct AccountController<S, R, T, P>
where
    S: ProfileStorage,
    R: ReceiptReader,
    T: TunnelControl,
    P: PurchaseBackend,
{
    // Profile index plus its underlying storage
    profiles: ProfileManager<S>,

    // The last fully-reloaded entitlement snapshot
    entitlements: EntitlementStore,

    // Pure eligibility reads over the snapshot
    gate: EligibilityGate,

    // Source of receipt parses
    receipt_reader: R,

    // Collaborator asked to disconnect after a revocation pass
    tunnel: T,

    // Platform purchase flow
    purchase_backend: P,

    // Receiver channel used to receive commands from the consumer
    command_rx: tokio::sync::mpsc::UnboundedReceiver<AccountCommand>,

    // Sender channel primarily used when the consumer requests a channel to
    // talk to the controller, but also to queue up commands to itself
    command_tx: tokio::sync::mpsc::UnboundedSender<AccountCommand>,

    // Event channel for consumers
    events: broadcast::Sender<AccountEvent>,

    // Listen for cancellation signals
    cancel_token: CancellationToken,
}

impl<S, R, T, P> AccountController<S, R, T, P>
where
    S: ProfileStorage,
    R: ReceiptReader,
    T: TunnelControl,
    P: PurchaseBackend,
{
    pub fn new(
        profiles: ProfileManager<S>,
        entitlements: EntitlementStore,
        gate: EligibilityGate,
        receipt_reader: R,
        tunnel: T,
        purchase_backend: P,
        cancel_token: CancellationToken,
    ) -> Self {
        let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        AccountController {
            profiles,
            entitlements,
            gate,
            receipt_reader,
            tunnel,
            purchase_backend,
            command_rx,
            command_tx,
            events,
            cancel_token,
        }
    }

    pub fn command_tx(&self) -> tokio::sync::mpsc::UnboundedSender<AccountCommand> {
        self.command_tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccountEvent> {
        self.events.subscribe()
    }

    pub fn profiles(&self) -> &ProfileManager<S> {
        &self.profiles
    }

    /// Creates a host profile, rejecting the request while the free-tier
    /// cap is reached. Enforcement happens here, at creation, so the
    /// review pass normally has nothing to delete.
    pub async fn create_host_profile(&mut self, profile: Profile) -> Result<Uuid, Error> {
        debug_assert!(profile.is_host() || profile.is_placeholder());
        if self
            .gate
            .has_reached_maximum_number_of_hosts(self.profiles.host_profile_count())
        {
            return Err(Error::TooManyHostProfiles {
                limit: MAX_FREE_HOSTS,
            });
        }
        Ok(self.profiles.save_profile(profile).await?)
    }

    /// Runs the platform purchase flow and, on success, queues a receipt
    /// reload so the snapshot catches up.
    pub async fn purchase(&self, product: &Product) -> Result<PurchaseOutcome, Error> {
        let outcome = self.purchase_backend.purchase(product).await?;
        match outcome {
            PurchaseOutcome::Done => {
                tracing::info!("Purchase completed: {product}");
                self.command_tx.send(AccountCommand::ReloadReceipt)?;
            }
            PurchaseOutcome::Cancelled => {
                tracing::debug!("Purchase cancelled by the user: {product}");
            }
        }
        Ok(outcome)
    }

    pub async fn restore_purchases(&self) -> Result<(), Error> {
        self.purchase_backend.restore_purchases().await?;
        self.command_tx.send(AccountCommand::ReloadReceipt)?;
        Ok(())
    }

    pub async fn reload_receipt(&mut self) -> Result<(), Error> {
        tracing::info!("Reloading purchase receipt");
        let newly_cancelled = self.entitlements.reload(&self.receipt_reader)?;
        let _ = self.events.send(AccountEvent::ReceiptReloaded);

        if !newly_cancelled.is_empty() {
            tracing::info!("Purchases cancelled since last reload: {newly_cancelled:?}");
            self.command_tx.send(AccountCommand::ReviewPurchases)?;
        }
        Ok(())
    }

    /// Revocation pass over all profiles. Idempotent: with unchanged
    /// entitlements a second run mutates nothing.
    pub async fn review_purchases(&mut self) -> Result<ReviewSummary, Error> {
        tracing::info!("Reviewing profiles against current entitlements");
        let mut summary = ReviewSummary::default();

        // ordered oldest first, so the cap keeps the earliest profiles
        let ordered: Vec<Profile> = self
            .profiles
            .all_profiles()
            .into_iter()
            .cloned()
            .collect();
        let mut removed: Vec<Uuid> = Vec::new();

        if !self.gate.is_eligible(&Product::UnlimitedHosts) {
            let over_cap: Vec<Uuid> = ordered
                .iter()
                .filter(|p| p.is_host())
                .skip(MAX_FREE_HOSTS)
                .map(|p| p.id)
                .collect();
            for id in over_cap {
                tracing::info!("Removing host profile over the free-tier cap: {id}");
                self.profiles.remove_profile(id).await?;
                removed.push(id);
                summary.removed_host_profiles += 1;
            }
        }

        for profile in &ordered {
            let Some(settings) = profile.provider() else {
                continue;
            };
            if !self.gate.is_eligible_for_provider(&settings.name) {
                tracing::info!(
                    "Removing profile for ineligible provider {}: {}",
                    settings.name,
                    profile.id
                );
                self.profiles.remove_profile(profile.id).await?;
                removed.push(profile.id);
                summary.removed_provider_profiles += 1;
            }
        }

        if !self.gate.is_eligible(&Product::TrustedNetworks) {
            for profile in ordered {
                if removed.contains(&profile.id) || !profile.on_demand.has_trust_customizations() {
                    continue;
                }
                tracing::info!("Stripping trusted-network state from profile {}", profile.id);
                let mut updated = profile;
                updated.on_demand.reset_trust();
                self.profiles.save_profile(updated).await?;
                summary.trust_resets += 1;
            }
        }

        if summary.mutated() {
            self.tunnel.request_disconnect().await;
        }
        let _ = self.events.send(AccountEvent::PurchasesReviewed(summary));
        Ok(summary)
    }

    async fn handle_command(&mut self, command: AccountCommand) -> Result<(), Error> {
        tracing::debug!("Received command: {command:?}");
        match command {
            AccountCommand::ReloadReceipt => self.reload_receipt().await,
            AccountCommand::ReviewPurchases => self.review_purchases().await.map(drop),
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    if let Err(err) = self.handle_command(command).await {
                        tracing::error!("{err:#?}");
                    }
                }
                _ = self.cancel_token.cancelled() => {
                    tracing::trace!("Received cancellation signal");
                    break;
                }
                else => {
                    tracing::debug!("Account controller channel closed");
                    break;
                }
            }
        }
        tracing::debug!("Account controller is exiting");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use passage_entitlements::{PurchaseRecord, Receipt};
    use passage_profiles::{
        HostSettings, InMemProfileStorage, OnDemandPolicy, ProfileKind, ProviderSettings,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct SwappableReader(Arc<Mutex<Receipt>>);

    impl SwappableReader {
        fn set(&self, receipt: Receipt) {
            *self.0.lock().unwrap() = receipt;
        }
    }

    impl ReceiptReader for SwappableReader {
        type ReadError = std::io::Error;

        fn receipt(&self) -> Result<Receipt, Self::ReadError> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    #[derive(Clone, Default)]
    struct FakeTunnel {
        disconnects: Arc<AtomicUsize>,
    }

    impl TunnelControl for FakeTunnel {
        async fn request_disconnect(&self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakePurchases;

    impl PurchaseBackend for FakePurchases {
        async fn purchase(&self, _product: &Product) -> Result<PurchaseOutcome, PurchaseError> {
            Ok(PurchaseOutcome::Done)
        }

        async fn restore_purchases(&self) -> Result<(), PurchaseError> {
            Ok(())
        }
    }

    type TestController =
        AccountController<InMemProfileStorage, SwappableReader, FakeTunnel, FakePurchases>;

    fn controller() -> (TestController, SwappableReader, FakeTunnel) {
        let reader = SwappableReader::default();
        let tunnel = FakeTunnel::default();
        let store = EntitlementStore::new();
        let controller = AccountController::new(
            ProfileManager::new(InMemProfileStorage::default()),
            store.clone(),
            EligibilityGate::new(store),
            reader.clone(),
            tunnel.clone(),
            FakePurchases,
            CancellationToken::new(),
        );
        (controller, reader, tunnel)
    }

    fn receipt_with(products: &[Product]) -> Receipt {
        Receipt {
            original_build_number: None,
            purchases: products
                .iter()
                .map(|p| PurchaseRecord::new(p.id()))
                .collect(),
        }
    }

    fn host_profile(name: &str) -> Profile {
        Profile::new(name, ProfileKind::Host(HostSettings::default()))
    }

    fn provider_profile(provider: &str) -> Profile {
        Profile::new(provider, ProfileKind::Provider(ProviderSettings::new(provider)))
    }

    #[tokio::test]
    async fn host_cap_rejects_creation_beyond_the_free_tier() {
        let (mut controller, _, _) = controller();
        for name in ["one", "two"] {
            controller.create_host_profile(host_profile(name)).await.unwrap();
        }

        let result = controller.create_host_profile(host_profile("three")).await;
        assert!(matches!(
            result,
            Err(Error::TooManyHostProfiles { limit: MAX_FREE_HOSTS })
        ));
        assert_eq!(controller.profiles().host_profile_count(), MAX_FREE_HOSTS);
    }

    #[tokio::test]
    async fn host_cap_lifted_by_unlimited_hosts() {
        let (mut controller, reader, _) = controller();
        reader.set(receipt_with(&[Product::UnlimitedHosts]));
        controller.reload_receipt().await.unwrap();

        for name in ["one", "two", "three"] {
            controller.create_host_profile(host_profile(name)).await.unwrap();
        }
        assert_eq!(controller.profiles().host_profile_count(), 3);
    }

    #[tokio::test]
    async fn review_strips_trust_state_but_keeps_the_profile() {
        let (mut controller, _, _) = controller();
        let mut profile = host_profile("office");
        profile.on_demand.enabled = true;
        profile.on_demand.policy = OnDemandPolicy::Excluding;
        profile.on_demand.trusted_wifis = HashMap::from([("home".to_owned(), true)]);
        let id = controller.create_host_profile(profile).await.unwrap();

        let summary = controller.review_purchases().await.unwrap();
        assert_eq!(summary.trust_resets, 1);

        let reviewed = controller.profiles().profile(id).unwrap();
        assert!(!reviewed.on_demand.has_trust_customizations());
        // policy and the on-demand switch survive, only trust is gone
        assert!(reviewed.on_demand.enabled);
        assert_eq!(reviewed.on_demand.policy, OnDemandPolicy::Excluding);
    }

    #[tokio::test]
    async fn review_deletes_newest_hosts_beyond_the_cap() {
        let (mut controller, reader, _) = controller();
        reader.set(receipt_with(&[Product::UnlimitedHosts]));
        controller.reload_receipt().await.unwrap();

        let mut ids = Vec::new();
        for (i, name) in ["oldest", "middle", "newest"].iter().enumerate() {
            let mut profile = host_profile(name);
            profile.created_at += chrono::Duration::seconds(i as i64);
            ids.push(controller.create_host_profile(profile).await.unwrap());
        }

        // the entitlement lapses
        reader.set(receipt_with(&[]));
        controller.reload_receipt().await.unwrap();
        let summary = controller.review_purchases().await.unwrap();

        assert_eq!(summary.removed_host_profiles, 1);
        assert!(controller.profiles().profile(ids[0]).is_some());
        assert!(controller.profiles().profile(ids[1]).is_some());
        assert!(controller.profiles().profile(ids[2]).is_none());
    }

    #[tokio::test]
    async fn review_deletes_profiles_of_ineligible_providers() {
        let (mut controller, reader, _) = controller();
        reader.set(receipt_with(&[Product::Provider("mullvad".to_owned())]));
        controller.reload_receipt().await.unwrap();

        let kept = controller
            .profiles
            .save_profile(provider_profile("mullvad"))
            .await
            .unwrap();
        let dropped = controller
            .profiles
            .save_profile(provider_profile("windscribe"))
            .await
            .unwrap();

        let summary = controller.review_purchases().await.unwrap();
        assert_eq!(summary.removed_provider_profiles, 1);
        assert!(controller.profiles().profile(kept).is_some());
        assert!(controller.profiles().profile(dropped).is_none());
    }

    #[tokio::test]
    async fn review_is_idempotent_and_disconnects_once() {
        let (mut controller, _, tunnel) = controller();
        let mut profile = host_profile("office");
        profile.on_demand.trusts_cellular = true;
        controller.create_host_profile(profile).await.unwrap();

        let first = controller.review_purchases().await.unwrap();
        assert!(first.mutated());
        assert_eq!(tunnel.disconnects.load(Ordering::SeqCst), 1);

        let second = controller.review_purchases().await.unwrap();
        assert_eq!(second, ReviewSummary::default());
        assert_eq!(tunnel.disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_in_reload_queues_a_review() {
        let (controller, reader, _) = controller();
        reader.set(receipt_with(&[Product::TrustedNetworks]));

        let commands = controller.command_tx();
        let mut events = controller.subscribe();
        let cancel_token = controller.cancel_token.clone();
        let handle = tokio::spawn(controller.run());

        commands.send(AccountCommand::ReloadReceipt).unwrap();
        assert_eq!(events.recv().await.unwrap(), AccountEvent::ReceiptReloaded);

        // refund the purchase; the reload queues a review on its own
        reader.set(Receipt {
            original_build_number: None,
            purchases: vec![
                PurchaseRecord::new(Product::TrustedNetworks.id()).cancelled_at(chrono::Utc::now()),
            ],
        });
        commands.send(AccountCommand::ReloadReceipt).unwrap();

        assert_eq!(events.recv().await.unwrap(), AccountEvent::ReceiptReloaded);
        let reviewed = events.recv().await.unwrap();
        assert!(matches!(reviewed, AccountEvent::PurchasesReviewed(_)));

        cancel_token.cancel();
        handle.await.unwrap();
    }
}
