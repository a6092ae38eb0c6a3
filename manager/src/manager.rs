use crate::{
    coordinator::Coordinator,
    error::Error,
    events::ManagerEvent,
    requester::Dispatcher,
    types::{
        Address, ManagerPolicy, RandomWordsRequest, RequestConfig, TopUpAccess, VrfRequest,
        VrfRequesterInfo,
    },
};
use ethnum::U256;
use std::collections::HashMap;

/// The request lifecycle state machine. Every externally triggered call
/// carries the caller's address and the current timestamp; one call runs to
/// completion before the next is processed, so the only concurrency that
/// matters is the interleaving of independent calls.
pub struct VrfManager<C: Coordinator, D: Dispatcher> {
    address: Address,
    owner: Address,
    executor: Option<Address>,
    coordinator: C,
    dispatcher: D,
    config: RequestConfig,
    policy: ManagerPolicy,
    paused: bool,
    balance: u128,
    requesters: HashMap<Address, VrfRequesterInfo>,
    requests: HashMap<U256, VrfRequest>,
    events: Vec<ManagerEvent>,
}

fn deadline_for(max_pending_time: u64, now: u64) -> u64 {
    // A pending time of zero means the request never expires
    if max_pending_time == 0 {
        u64::MAX
    } else {
        now.saturating_add(max_pending_time)
    }
}

impl<C: Coordinator, D: Dispatcher> VrfManager<C, D> {
    /// Create a manager owned by `owner`, forwarding requests to
    /// `coordinator` and routing callbacks through `dispatcher`
    pub fn new(
        address: Address,
        owner: Address,
        coordinator: C,
        dispatcher: D,
        policy: ManagerPolicy,
    ) -> Self {
        VrfManager {
            address,
            owner,
            executor: None,
            coordinator,
            dispatcher,
            config: RequestConfig::default(),
            policy,
            paused: false,
            balance: 0,
            requesters: HashMap::new(),
            requests: HashMap::new(),
            events: Vec::new(),
        }
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), Error> {
        if caller != self.owner {
            return Err(Error::OwnerForbidden);
        }
        Ok(())
    }

    /// Request `num_words` random words on behalf of a registered requester.
    /// Returns the coordinator request id the fulfillment will refer to.
    pub fn request_vrf(&mut self, caller: Address, num_words: u32, now: u64) -> Result<U256, Error> {
        if self.paused {
            return Err(Error::Paused);
        }
        let info = *self
            .requesters
            .get(&caller)
            .ok_or(Error::RequesterForbidden)?;
        let sub_id = self.config.sub_id.ok_or(Error::NotSubscribed)?;

        let request_id = self.coordinator.request_random_words(&RandomWordsRequest {
            key_hash: self.config.key_hash,
            sub_id,
            request_confirmations: self.config.request_confirmations,
            callback_gas_limit: self.config.callback_gas_limit,
            num_words,
        })?;

        self.requests.insert(
            request_id,
            VrfRequest {
                id: request_id,
                deadline: deadline_for(info.max_vrf_pending_time, now),
                num_words,
                requester: caller,
            },
        );
        log::debug!("vrf requested by {} under id {}", caller, request_id);
        Ok(request_id)
    }

    /// Deliver random words for an outstanding request. Only the coordinator
    /// may call this, and it is expected to have verified the oracle proof
    /// already; this side only authenticates the caller and routes.
    ///
    /// The entry is removed before the dispatcher runs, so a consumer that
    /// re-enters during its callback observes the request as absent and a
    /// second delivery always fails. A failed callback puts the entry back.
    pub fn raw_fulfill_random_words(
        &mut self,
        caller: Address,
        request_id: U256,
        random_words: &[U256],
        now: u64,
    ) -> Result<(), Error> {
        if caller != self.coordinator.address() {
            return Err(Error::OnlyCoordinatorCanFulfill);
        }
        let request = *self
            .requests
            .get(&request_id)
            .ok_or(Error::InvalidRequestId("no pending request under this id"))?;
        if self.policy.enforce_fulfillment_deadline && now > request.deadline {
            return Err(Error::InvalidRequestId("VRF request expired"));
        }

        self.requests.remove(&request_id);
        if let Err(failure) =
            self.dispatcher
                .fulfill_vrf(self.address, request.requester, request.id, random_words)
        {
            log::warn!(
                "callback for request {} to {} failed: {}",
                request_id,
                request.requester,
                failure
            );
            self.requests.insert(request_id, request);
            return Err(Error::CallbackFailed(failure));
        }
        log::debug!(
            "request {} fulfilled for {} as logical id {}",
            request_id,
            request.requester,
            request.id
        );
        Ok(())
    }

    /// Reissue a request whose deadline has elapsed. Callable by anyone:
    /// timeouts are public knowledge and retrying costs the caller nothing
    /// but the transaction. The new entry keeps the original logical id.
    pub fn retry_request_vrf(
        &mut self,
        _caller: Address,
        request_id: U256,
        now: u64,
    ) -> Result<U256, Error> {
        let request = *self
            .requests
            .get(&request_id)
            .ok_or(Error::InvalidRequestId("no pending request under this id"))?;
        if now < request.deadline {
            return Err(Error::InvalidRequestId("VRF request is alive"));
        }
        let info = *self
            .requesters
            .get(&request.requester)
            .ok_or(Error::RequesterForbidden)?;
        let sub_id = self.config.sub_id.ok_or(Error::NotSubscribed)?;

        let new_request_id = self.coordinator.request_random_words(&RandomWordsRequest {
            key_hash: self.config.key_hash,
            sub_id,
            request_confirmations: self.config.request_confirmations,
            callback_gas_limit: self.config.callback_gas_limit,
            num_words: request.num_words,
        })?;

        self.requests.remove(&request_id);
        self.requests.insert(
            new_request_id,
            VrfRequest {
                // Carry the very first id of this logical request
                id: request.id,
                deadline: deadline_for(info.max_vrf_pending_time, now),
                num_words: request.num_words,
                requester: request.requester,
            },
        );
        log::info!("request {} retried as {}", request_id, new_request_id);
        self.events.push(ManagerEvent::VrfRequestRetried {
            old_request_id: request_id,
            new_request_id,
        });
        Ok(new_request_id)
    }

    /// Register a requester with its pending-time budget
    pub fn add_vrf_requester(
        &mut self,
        caller: Address,
        requester: Address,
        max_vrf_pending_time: u64,
    ) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        if self.requesters.contains_key(&requester) {
            return Err(Error::InvalidRequesterAddress(
                "VRF requester is already added",
            ));
        }
        self.requesters
            .insert(requester, VrfRequesterInfo { max_vrf_pending_time });
        log::info!("requester {} added", requester);
        self.events.push(ManagerEvent::VrfRequesterAdded {
            requester,
            max_vrf_pending_time,
        });
        Ok(())
    }

    /// Remove a registered requester
    pub fn remove_vrf_requester(&mut self, caller: Address, requester: Address) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        if self.requesters.remove(&requester).is_none() {
            return Err(Error::InvalidRequesterAddress(
                "VRF requester is not registered",
            ));
        }
        log::info!("requester {} removed", requester);
        self.events
            .push(ManagerEvent::VrfRequesterRemoved { requester });
        Ok(())
    }

    /// Change the pending-time budget of a registered requester
    pub fn change_max_vrf_pending_time(
        &mut self,
        caller: Address,
        requester: Address,
        max_vrf_pending_time: u64,
    ) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        let info = self.requesters.get_mut(&requester).ok_or(
            Error::InvalidRequesterAddress("VRF requester is not registered"),
        )?;
        info.max_vrf_pending_time = max_vrf_pending_time;
        self.events.push(ManagerEvent::MaxVrfPendingTimeChanged {
            requester,
            max_vrf_pending_time,
        });
        Ok(())
    }

    /// Update the request configuration. The subscription id assigned at
    /// subscribe time is preserved.
    pub fn set_config(
        &mut self,
        caller: Address,
        key_hash: [u8; 32],
        request_confirmations: u16,
        callback_gas_limit: u32,
    ) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        self.config = RequestConfig {
            key_hash,
            request_confirmations,
            callback_gas_limit,
            sub_id: self.config.sub_id,
        };
        self.events.push(ManagerEvent::ConfigChanged {
            key_hash,
            request_confirmations,
            callback_gas_limit,
        });
        Ok(())
    }

    /// Replace the coordinator. The owner may migrate at will; the current
    /// coordinator may hand over to its successor.
    pub fn set_coordinator(&mut self, caller: Address, coordinator: C) -> Result<(), Error> {
        if caller != self.owner && caller != self.coordinator.address() {
            return Err(Error::OnlyOwnerOrCoordinator);
        }
        let previous = self.coordinator.address();
        let new = coordinator.address();
        self.coordinator = coordinator;
        log::info!("coordinator changed {} -> {}", previous, new);
        self.events.push(ManagerEvent::CoordinatorChanged {
            previous_coordinator: previous,
            new_coordinator: new,
        });
        Ok(())
    }

    /// Name an executor for policies that allow one
    pub fn set_executor(&mut self, caller: Address, executor: Option<Address>) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        self.executor = executor;
        Ok(())
    }

    /// Open the funding subscription
    pub fn subscribe(&mut self, caller: Address) -> Result<u64, Error> {
        self.ensure_owner(caller)?;
        if self.config.sub_id.is_some() {
            return Err(Error::SubscribeConflict);
        }
        let sub_id = self.coordinator.create_subscription()?;
        self.config.sub_id = Some(sub_id);
        log::info!("subscribed under {}", sub_id);
        self.events.push(ManagerEvent::Subscribed { sub_id });
        Ok(sub_id)
    }

    /// Close the funding subscription, sending remaining funds to `receiver`
    pub fn unsubscribe(&mut self, caller: Address, receiver: Address) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        let sub_id = self.config.sub_id.ok_or(Error::UnsubscribeConflict)?;
        self.coordinator.cancel_subscription(sub_id, receiver)?;
        self.config.sub_id = None;
        log::info!("unsubscribed from {}", sub_id);
        self.events
            .push(ManagerEvent::Unsubscribed { sub_id, receiver });
        Ok(())
    }

    /// Forward the accrued balance into the subscription
    pub fn top_up_subscription(&mut self, caller: Address) -> Result<(), Error> {
        let authorized = match self.policy.top_up_access {
            TopUpAccess::OwnerOnly => caller == self.owner,
            TopUpAccess::OwnerOrExecutor => {
                caller == self.owner || Some(caller) == self.executor
            }
        };
        if !authorized {
            return Err(Error::ExecutorForbidden);
        }
        let sub_id = self.config.sub_id.ok_or(Error::NotSubscribed)?;
        let amount = self.balance;
        self.coordinator.fund_subscription(sub_id, amount)?;
        self.balance = 0;
        self.events
            .push(ManagerEvent::SubscriptionToppedUp { sub_id, amount });
        Ok(())
    }

    /// Accrue funds to be forwarded by the next top-up
    pub fn deposit(&mut self, amount: u128) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Stop accepting new requests
    pub fn pause(&mut self, caller: Address) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        if self.paused {
            return Err(Error::Paused);
        }
        self.paused = true;
        self.events.push(ManagerEvent::ManagerPaused);
        Ok(())
    }

    /// Accept requests again
    pub fn unpause(&mut self, caller: Address) -> Result<(), Error> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(Error::NotPaused);
        }
        self.paused = false;
        self.events.push(ManagerEvent::ManagerUnpaused);
        Ok(())
    }

    /// The outstanding request stored under a coordinator id
    pub fn vrf_request(&self, request_id: U256) -> Option<&VrfRequest> {
        self.requests.get(&request_id)
    }

    /// The registry entry of a requester address
    pub fn vrf_requester(&self, requester: Address) -> Option<&VrfRequesterInfo> {
        self.requesters.get(&requester)
    }

    /// Current request configuration
    pub fn request_config(&self) -> &RequestConfig {
        &self.config
    }

    /// Address fulfillment calls must come from
    pub fn coordinator_address(&self) -> Address {
        self.coordinator.address()
    }

    /// The coordinator handed over at construction or migration
    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    /// Mutable access to the coordinator for the embedding runtime
    pub fn coordinator_mut(&mut self) -> &mut C {
        &mut self.coordinator
    }

    /// The callback router handed over at construction
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Mutable access to the callback router for the embedding runtime
    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// This manager's own address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether new requests are rejected
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Funds accrued and not yet forwarded
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Drain emitted events
    pub fn take_events(&mut self) -> Vec<ManagerEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requester::RequesterError;

    const OWNER: Address = Address([0x01; 20]);
    const COORDINATOR_ADDRESS: Address = Address([0x02; 20]);
    const MANAGER_ADDRESS: Address = Address([0x03; 20]);
    const REQUESTER: Address = Address([0x04; 20]);
    const STRANGER: Address = Address([0x05; 20]);
    const MAX_PENDING_TIME: u64 = 300;

    struct MockCoordinator {
        address: Address,
        next_request: u128,
        next_sub: u64,
    }

    impl MockCoordinator {
        fn at(address: Address) -> Self {
            MockCoordinator {
                address,
                next_request: 1,
                next_sub: 7,
            }
        }
    }

    impl Coordinator for MockCoordinator {
        fn address(&self) -> Address {
            self.address
        }

        fn request_random_words(
            &mut self,
            _request: &RandomWordsRequest,
        ) -> Result<U256, crate::CoordinatorError> {
            let id = U256::new(self.next_request);
            self.next_request += 1;
            Ok(id)
        }

        fn create_subscription(&mut self) -> Result<u64, crate::CoordinatorError> {
            let sub = self.next_sub;
            self.next_sub += 1;
            Ok(sub)
        }

        fn cancel_subscription(
            &mut self,
            _sub_id: u64,
            _receiver: Address,
        ) -> Result<(), crate::CoordinatorError> {
            Ok(())
        }

        fn fund_subscription(
            &mut self,
            _sub_id: u64,
            _amount: u128,
        ) -> Result<(), crate::CoordinatorError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        deliveries: Vec<(Address, U256, Vec<U256>)>,
        fail_next: bool,
    }

    impl Dispatcher for RecordingDispatcher {
        fn fulfill_vrf(
            &mut self,
            _manager: Address,
            requester: Address,
            id: U256,
            random_words: &[U256],
        ) -> Result<(), RequesterError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(RequesterError::Rejected("consumer reverted"));
            }
            self.deliveries.push((requester, id, random_words.to_vec()));
            Ok(())
        }
    }

    fn manager_with_policy(
        policy: ManagerPolicy,
    ) -> VrfManager<MockCoordinator, RecordingDispatcher> {
        let mut manager = VrfManager::new(
            MANAGER_ADDRESS,
            OWNER,
            MockCoordinator::at(COORDINATOR_ADDRESS),
            RecordingDispatcher::default(),
            policy,
        );
        manager
            .set_config(OWNER, [0xAA; 32], 1, 100_000)
            .expect("set config");
        manager.subscribe(OWNER).expect("subscribe");
        manager
            .add_vrf_requester(OWNER, REQUESTER, MAX_PENDING_TIME)
            .expect("add requester");
        manager.take_events();
        manager
    }

    fn manager() -> VrfManager<MockCoordinator, RecordingDispatcher> {
        manager_with_policy(ManagerPolicy::default())
    }

    #[test]
    fn request_is_forbidden_for_unregistered_caller() {
        let mut m = manager();
        assert_eq!(m.request_vrf(STRANGER, 1, 0), Err(Error::RequesterForbidden));
    }

    #[test]
    fn request_is_rejected_while_paused() {
        let mut m = manager();
        m.pause(OWNER).expect("pause");
        assert_eq!(m.request_vrf(REQUESTER, 1, 0), Err(Error::Paused));
        m.unpause(OWNER).expect("unpause");
        assert!(m.request_vrf(REQUESTER, 1, 0).is_ok());
    }

    #[test]
    fn request_needs_a_subscription() {
        let mut m = VrfManager::new(
            MANAGER_ADDRESS,
            OWNER,
            MockCoordinator::at(COORDINATOR_ADDRESS),
            RecordingDispatcher::default(),
            ManagerPolicy::default(),
        );
        m.add_vrf_requester(OWNER, REQUESTER, MAX_PENDING_TIME)
            .expect("add requester");
        assert_eq!(m.request_vrf(REQUESTER, 1, 0), Err(Error::NotSubscribed));
    }

    #[test]
    fn stored_request_reflects_the_call() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 3, 1_000).expect("request");
        let stored = *m.vrf_request(id).expect("stored");
        assert_eq!(stored.id, id);
        assert_eq!(stored.deadline, 1_000 + MAX_PENDING_TIME);
        assert_eq!(stored.num_words, 3);
        assert_eq!(stored.requester, REQUESTER);
    }

    #[test]
    fn fulfillment_is_coordinator_only() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        assert_eq!(
            m.raw_fulfill_random_words(STRANGER, id, &[U256::new(9)], 10),
            Err(Error::OnlyCoordinatorCanFulfill)
        );
    }

    #[test]
    fn a_request_is_fulfilled_at_most_once() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(9)], 10)
            .expect("first fulfillment");
        assert_eq!(
            m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(9)], 11),
            Err(Error::InvalidRequestId("no pending request under this id"))
        );
        assert_eq!(m.dispatcher.deliveries.len(), 1);
        assert_eq!(m.dispatcher.deliveries[0], (REQUESTER, id, vec![U256::new(9)]));
    }

    #[test]
    fn retry_is_gated_on_the_deadline_and_carries_the_original_id() {
        let mut m = manager();
        let first = m.request_vrf(REQUESTER, 1, 0).expect("request");

        assert_eq!(
            m.retry_request_vrf(STRANGER, first, 200),
            Err(Error::InvalidRequestId("VRF request is alive"))
        );

        let second = m.retry_request_vrf(STRANGER, first, 301).expect("retry");
        assert!(m.vrf_request(first).is_none());
        assert_eq!(m.vrf_request(second).expect("stored").id, first);
        assert_eq!(
            m.take_events(),
            vec![ManagerEvent::VrfRequestRetried {
                old_request_id: first,
                new_request_id: second,
            }]
        );

        // A second retry still points back at the very first id
        let third = m
            .retry_request_vrf(STRANGER, second, 301 + MAX_PENDING_TIME)
            .expect("second retry");
        assert!(m.vrf_request(second).is_none());
        assert_eq!(m.vrf_request(third).expect("stored").id, first);

        // Fulfillment of the latest id delivers the original one
        m.raw_fulfill_random_words(
            COORDINATOR_ADDRESS,
            third,
            &[U256::new(5)],
            301 + MAX_PENDING_TIME + 1,
        )
        .expect("fulfill");
        assert_eq!(m.dispatcher.deliveries[0].1, first);
    }

    #[test]
    fn retry_of_a_fulfilled_request_fails() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], 10)
            .expect("fulfill");
        assert_eq!(
            m.retry_request_vrf(STRANGER, id, 10_000),
            Err(Error::InvalidRequestId("no pending request under this id"))
        );
    }

    #[test]
    fn retry_fails_once_the_requester_was_removed() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        m.remove_vrf_requester(OWNER, REQUESTER).expect("remove");
        assert_eq!(
            m.retry_request_vrf(STRANGER, id, 10_000),
            Err(Error::RequesterForbidden)
        );
    }

    #[test]
    fn late_fulfillment_is_rejected_when_the_policy_enforces_deadlines() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        assert_eq!(
            m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], 3_000),
            Err(Error::InvalidRequestId("VRF request expired"))
        );
        // The entry survives, so the request can still be retried
        assert!(m.vrf_request(id).is_some());
        assert!(m.retry_request_vrf(STRANGER, id, 3_000).is_ok());
    }

    #[test]
    fn late_fulfillment_is_accepted_when_the_policy_ignores_deadlines() {
        let mut m = manager_with_policy(ManagerPolicy {
            enforce_fulfillment_deadline: false,
            top_up_access: TopUpAccess::OwnerOnly,
        });
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], 3_000)
            .expect("late fulfillment");
    }

    #[test]
    fn zero_pending_time_means_no_expiry() {
        let mut m = manager();
        m.change_max_vrf_pending_time(OWNER, REQUESTER, 0)
            .expect("change pending time");
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        // Never expired for fulfillment, never eligible for retry
        assert_eq!(
            m.retry_request_vrf(STRANGER, id, u64::MAX - 1),
            Err(Error::InvalidRequestId("VRF request is alive"))
        );
        m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], u64::MAX - 1)
            .expect("fulfillment long after the request");
    }

    #[test]
    fn failed_callback_reinstates_the_request() {
        let mut m = manager();
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        m.dispatcher.fail_next = true;
        assert_eq!(
            m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], 10),
            Err(Error::CallbackFailed(RequesterError::Rejected(
                "consumer reverted"
            )))
        );
        assert!(m.vrf_request(id).is_some());
        m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], 11)
            .expect("second attempt");
        assert!(m.vrf_request(id).is_none());
    }

    #[test]
    fn registration_guards_reject_duplicates_and_absentees() {
        let mut m = manager();
        assert_eq!(
            m.add_vrf_requester(OWNER, REQUESTER, 1_000),
            Err(Error::InvalidRequesterAddress("VRF requester is already added"))
        );
        m.remove_vrf_requester(OWNER, REQUESTER).expect("remove");
        assert_eq!(
            m.remove_vrf_requester(OWNER, REQUESTER),
            Err(Error::InvalidRequesterAddress("VRF requester is not registered"))
        );
        assert_eq!(
            m.change_max_vrf_pending_time(OWNER, REQUESTER, 10),
            Err(Error::InvalidRequesterAddress("VRF requester is not registered"))
        );
    }

    #[test]
    fn registry_mutations_are_owner_only() {
        let mut m = manager();
        assert_eq!(
            m.add_vrf_requester(STRANGER, STRANGER, 10),
            Err(Error::OwnerForbidden)
        );
        assert_eq!(
            m.remove_vrf_requester(STRANGER, REQUESTER),
            Err(Error::OwnerForbidden)
        );
        assert_eq!(
            m.change_max_vrf_pending_time(STRANGER, REQUESTER, 10),
            Err(Error::OwnerForbidden)
        );
        assert_eq!(
            m.set_config(STRANGER, [0u8; 32], 1, 1),
            Err(Error::OwnerForbidden)
        );
    }

    #[test]
    fn registry_view_reports_the_budget() {
        let m = manager();
        assert_eq!(
            m.vrf_requester(REQUESTER),
            Some(&VrfRequesterInfo {
                max_vrf_pending_time: MAX_PENDING_TIME
            })
        );
        assert_eq!(m.vrf_requester(STRANGER), None);
    }

    #[test]
    fn set_config_preserves_the_subscription_id() {
        let mut m = manager();
        let sub_id = m.request_config().sub_id;
        assert!(sub_id.is_some());
        m.set_config(OWNER, [0xBB; 32], 2, 200_000).expect("set config");
        let config = *m.request_config();
        assert_eq!(config.key_hash, [0xBB; 32]);
        assert_eq!(config.request_confirmations, 2);
        assert_eq!(config.callback_gas_limit, 200_000);
        assert_eq!(config.sub_id, sub_id);
    }

    #[test]
    fn subscription_conflicts_are_rejected() {
        let mut m = manager();
        assert_eq!(m.subscribe(OWNER), Err(Error::SubscribeConflict));
        m.unsubscribe(OWNER, MANAGER_ADDRESS).expect("unsubscribe");
        assert_eq!(
            m.unsubscribe(OWNER, MANAGER_ADDRESS),
            Err(Error::UnsubscribeConflict)
        );
        assert_eq!(m.subscribe(STRANGER), Err(Error::OwnerForbidden));
    }

    #[test]
    fn top_up_forwards_the_accrued_balance() {
        let mut m = manager();
        m.deposit(1_000);
        assert_eq!(m.balance(), 1_000);
        assert_eq!(m.top_up_subscription(STRANGER), Err(Error::ExecutorForbidden));
        m.top_up_subscription(OWNER).expect("top up");
        assert_eq!(m.balance(), 0);
        let sub_id = m.request_config().sub_id.expect("subscribed");
        assert!(m.take_events().contains(&ManagerEvent::SubscriptionToppedUp {
            sub_id,
            amount: 1_000
        }));
    }

    #[test]
    fn executor_may_top_up_when_the_policy_allows_it() {
        let mut m = manager_with_policy(ManagerPolicy {
            enforce_fulfillment_deadline: true,
            top_up_access: TopUpAccess::OwnerOrExecutor,
        });
        m.set_executor(OWNER, Some(STRANGER)).expect("set executor");
        m.top_up_subscription(STRANGER).expect("executor top up");
        // And still not just anyone
        assert_eq!(
            m.top_up_subscription(REQUESTER),
            Err(Error::ExecutorForbidden)
        );
    }

    #[test]
    fn coordinator_migration_is_owner_or_coordinator_only() {
        let new_address = Address([0x06; 20]);
        let mut m = manager();
        assert_eq!(
            m.set_coordinator(STRANGER, MockCoordinator::at(new_address)),
            Err(Error::OnlyOwnerOrCoordinator)
        );

        // The current coordinator may hand over
        m.set_coordinator(COORDINATOR_ADDRESS, MockCoordinator::at(new_address))
            .expect("handover");
        assert_eq!(m.coordinator_address(), new_address);

        // After migration the old coordinator can no longer fulfill
        let id = m.request_vrf(REQUESTER, 1, 0).expect("request");
        assert_eq!(
            m.raw_fulfill_random_words(COORDINATOR_ADDRESS, id, &[U256::new(1)], 10),
            Err(Error::OnlyCoordinatorCanFulfill)
        );
        m.raw_fulfill_random_words(new_address, id, &[U256::new(1)], 10)
            .expect("fulfill from the new coordinator");

        // The owner may migrate as well
        m.set_coordinator(OWNER, MockCoordinator::at(COORDINATOR_ADDRESS))
            .expect("owner migration");
        assert_eq!(m.coordinator_address(), COORDINATOR_ADDRESS);
    }
}
